use js_sys::{Function, Reflect};
use shared::api::HostMessage;
use shared::reel::HostChannel;
use shared::Prize;
use wasm_bindgen::{JsCast, JsValue};

fn lookup(root: &JsValue, path: &[&str]) -> Option<JsValue> {
    path.iter().try_fold(root.clone(), |value, key| {
        let next = Reflect::get(&value, &JsValue::from_str(key)).ok()?;
        if next.is_undefined() || next.is_null() {
            None
        } else {
            Some(next)
        }
    })
}

/// `window.Telegram.WebApp`, when the page runs inside the chat client.
fn web_app() -> Option<JsValue> {
    let window = web_sys::window()?;
    lookup(&window, &["Telegram", "WebApp"])
}

pub fn telegram_user_id() -> Option<i64> {
    let id = lookup(&web_app()?, &["initDataUnsafe", "user", "id"])?;
    id.as_f64().map(|id| id as i64)
}

/// Posts the final prize back to the chat application hosting the widget.
#[derive(Debug, Default, Clone, Copy)]
pub struct TelegramHost;

impl HostChannel for TelegramHost {
    fn send_result(&self, prize: &Prize) {
        let message = match serde_json::to_string(&HostMessage::from(prize.clone())) {
            Ok(message) => message,
            Err(e) => {
                log::error!("could not serialize spin result: {}", e);
                return;
            }
        };

        let Some(app) = web_app() else {
            log::info!("no host application, result not forwarded: {}", message);
            return;
        };
        let send = Reflect::get(&app, &JsValue::from_str("sendData"))
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok());
        match send {
            Some(send) => {
                if let Err(e) = send.call1(&app, &JsValue::from_str(&message)) {
                    log::error!("sendData failed: {:?}", e);
                }
            }
            None => log::warn!("host application has no sendData"),
        }
    }
}

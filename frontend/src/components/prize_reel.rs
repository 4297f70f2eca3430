use std::rc::Rc;

use shared::reel::{ControllerConfig, OutcomeMode, OutcomeSource, SpinController};
use shared::{PrizeCatalog, ReelError, WonGift};
use wasm_bindgen_futures::spawn_local;
use web_sys::window;
use yew::prelude::*;

use super::reel_widgets::{GiftList, ResultDisplay, SpinButton, SpinMessage};
use crate::config;
use crate::host::TelegramHost;
use crate::outcome::outcome_source;
use crate::styles;
use crate::surface::DomReel;

type Controller = SpinController<Box<dyn OutcomeSource>, DomReel, TelegramHost>;

#[function_component(PrizeReel)]
pub fn prize_reel() -> Html {
    // Apply reel CSS
    {
        use_effect_with((), move |_| {
            let style_element = window()
                .and_then(|w| w.document())
                .and_then(|document| {
                    let head = document.head()?;
                    let style = document.create_element("style").ok()?;
                    style.set_text_content(Some(styles::REEL_CSS));
                    head.append_child(&style).ok()?;
                    Some(style)
                });

            move || {
                if let Some(style) = style_element {
                    style.remove();
                }
            }
        });
    }

    let reel = use_memo((), |_| DomReel::default());
    let mode = *use_memo((), |_| config::outcome_mode());
    let controller = use_state(|| None::<Rc<Controller>>);
    let attempts_left = use_state(|| 0u32);
    let gifts = use_state(Vec::<WonGift>::new);
    let is_spinning = use_state(|| false);
    let session_disabled = use_state(|| false);
    let message = use_state(|| None::<SpinMessage>);

    // One controller per mounted widget
    {
        let reel = reel.clone();
        let controller_handle = controller.clone();
        let attempts_left = attempts_left.clone();
        let gifts = gifts.clone();
        let session_disabled = session_disabled.clone();
        let message = message.clone();

        use_effect_with((), move |_| {
            let catalog = PrizeCatalog::standard();
            let source = outcome_source(mode, &catalog);
            let controller = Rc::new(SpinController::new(
                catalog,
                source,
                (*reel).clone(),
                TelegramHost,
                ControllerConfig::default(),
            ));
            controller.render_idle();
            controller_handle.set(Some(controller.clone()));

            let user_id = config::user_id(mode);
            {
                let controller = controller.clone();
                spawn_local(async move {
                    match controller.start(user_id).await {
                        Ok(status) => {
                            attempts_left.set(status.attempts_left);
                            gifts.set(status.gifts);
                        }
                        Err(e) => {
                            session_disabled.set(true);
                            message.set(Some(SpinMessage::Error(e.to_string())));
                        }
                    }
                });
            }

            move || controller.teardown()
        });
    }

    let on_spin = {
        let controller = controller.clone();
        let attempts_left = attempts_left.clone();
        let gifts = gifts.clone();
        let is_spinning = is_spinning.clone();
        let session_disabled = session_disabled.clone();
        let message = message.clone();

        Callback::from(move |_: MouseEvent| {
            let Some(controller) = (*controller).clone() else {
                return;
            };
            if !controller.can_spin() {
                log::debug!("spin ignored, gate closed");
                return;
            }

            let attempts_left = attempts_left.clone();
            let gifts = gifts.clone();
            let is_spinning = is_spinning.clone();
            let session_disabled = session_disabled.clone();
            let message = message.clone();

            is_spinning.set(true);
            message.set(None);
            spawn_local(async move {
                match controller.spin().await {
                    Ok(report) => {
                        attempts_left.set(report.attempts_left);
                        if report.won {
                            message.set(Some(SpinMessage::Won(report.prize)));
                            match controller.refresh_status().await {
                                Ok(status) => {
                                    attempts_left.set(status.attempts_left);
                                    gifts.set(status.gifts);
                                }
                                Err(e) => log::warn!("could not reload gifts: {}", e),
                            }
                        } else {
                            message.set(Some(SpinMessage::Lost));
                        }
                    }
                    Err(e) if e.is_redundant_click() => {}
                    Err(ReelError::SessionClosed) => return,
                    Err(e) => {
                        if e.disables_session() {
                            session_disabled.set(true);
                        }
                        message.set(Some(SpinMessage::Error(e.to_string())));
                    }
                }
                is_spinning.set(false);
            });
        })
    };

    html! {
        <div class={styles::CONTAINER_SM}>
            <h2 class={classes!(styles::TEXT_H2, "text-center", "mb-2")}>{"Prize Reel"}</h2>
            <p class={classes!(styles::TEXT_SMALL, "text-center", "mb-4")}>
                {format!("Attempts left: {}", *attempts_left)}
            </p>
            {
                if mode == OutcomeMode::LocalFallback {
                    html! { <p class={classes!(styles::TEXT_HINT, "text-center", "mb-2")}>{"Offline mode"}</p> }
                } else {
                    html! {}
                }
            }

            <div class="reel-frame" ref={reel.frame.clone()}>
                <div class="reel-viewport" ref={reel.viewport.clone()}>
                    <div class="reel-track" ref={reel.track.clone()}></div>
                    <div class="reel-pointer" ref={reel.pointer.clone()}></div>
                </div>
            </div>

            <SpinButton
                is_spinning={*is_spinning}
                attempts_left={*attempts_left}
                disabled={controller.is_none() || *session_disabled}
                onclick={on_spin}
            />
            <ResultDisplay message={(*message).clone()} />
            <GiftList gifts={(*gifts).clone()} />
        </div>
    }
}

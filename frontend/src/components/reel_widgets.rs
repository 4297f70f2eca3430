use shared::{Prize, WonGift};
use yew::prelude::*;

use crate::config::get_asset_url;
use crate::styles;

/// What the widget tells the user after the last action.
#[derive(Clone, Debug, PartialEq)]
pub enum SpinMessage {
    Won(Prize),
    Lost,
    Error(String),
}

#[derive(Properties, PartialEq)]
pub struct ResultDisplayProps {
    pub message: Option<SpinMessage>,
}

#[function_component(ResultDisplay)]
pub fn result_display(props: &ResultDisplayProps) -> Html {
    let Some(message) = &props.message else {
        return html! {};
    };

    let (class, text, animation_class) = match message {
        SpinMessage::Won(prize) => (
            styles::CARD_SUCCESS,
            format!("You won {} ({} ⭐)!", prize.name, prize.value),
            "animate-bounce",
        ),
        SpinMessage::Lost => (styles::CARD_NEUTRAL, "Nothing this time.".to_string(), ""),
        SpinMessage::Error(error) => (styles::CARD_ERROR, error.clone(), ""),
    };

    html! {
        <div class="mt-6 flex justify-center">
            <div class={classes!(class, animation_class, "text-center", "font-semibold")}>
                {text}
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct SpinButtonProps {
    pub is_spinning: bool,
    pub attempts_left: u32,
    pub disabled: bool,
    pub onclick: Callback<MouseEvent>,
}

#[function_component(SpinButton)]
pub fn spin_button(props: &SpinButtonProps) -> Html {
    let button_text = if props.is_spinning {
        "Spinning..."
    } else if props.attempts_left == 0 {
        "No attempts left"
    } else {
        "Spin"
    };

    // The gate already rejects overlapping spins; the button mirrors it.
    let is_disabled = props.disabled || props.is_spinning || props.attempts_left == 0;
    let button_class = if is_disabled {
        styles::BUTTON_DISABLED
    } else {
        styles::BUTTON_PRIMARY
    };

    html! {
        <button
            onclick={props.onclick.clone()}
            disabled={is_disabled}
            class={classes!(button_class, "w-full", "mt-6", "py-3", "text-lg")}
        >
            {button_text}
        </button>
    }
}

#[derive(Properties, PartialEq)]
pub struct GiftListProps {
    pub gifts: Vec<WonGift>,
}

#[function_component(GiftList)]
pub fn gift_list(props: &GiftListProps) -> Html {
    if props.gifts.is_empty() {
        return html! {};
    }

    html! {
        <div class={classes!(styles::CARD, "mt-6")}>
            <h3 class={styles::TEXT_H3}>{"Your gifts"}</h3>
            <ul class="mt-3 space-y-2">
                { for props.gifts.iter().map(|gift| html! {
                    <li class="flex items-center gap-3">
                        {
                            if let Some(image) = &gift.prize.image_ref {
                                html! { <img class="w-8 h-8 object-contain" src={get_asset_url(image)} alt={gift.prize.name.clone()} /> }
                            } else {
                                html! {}
                            }
                        }
                        <span class={styles::TEXT_BODY}>{&gift.prize.name}</span>
                        <span class={styles::TEXT_SMALL}>{gift.date.clone().unwrap_or_default()}</span>
                    </li>
                })}
            </ul>
        </div>
    }
}

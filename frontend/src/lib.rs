pub mod components;
pub mod config;
pub mod host;
pub mod outcome;
pub mod styles;
pub mod surface;

use yew::prelude::*;

use crate::components::PrizeReel;

#[function_component(App)]
pub fn app() -> Html {
    html! {
        <div class={styles::CONTAINER}>
            <div class="mx-auto py-6">
                <PrizeReel />
            </div>
        </div>
    }
}

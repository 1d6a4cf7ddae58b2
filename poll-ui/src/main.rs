mod app;
mod bridge;
mod editor;
mod logging;
mod storage;
mod survey;

use app::App;
use leptos::*;

fn main() {
    logging::init();
    mount_to_body(|| view! { <App/> });
}

use super::super::Model;
use super::super::Msg;
use gloo_storage::{LocalStorage, Storage};
use yew::html::Scope;
use yew::prelude::*;

const THEME_KEY: &str = "image-analyzer-theme";

pub fn load_theme() -> String {
    LocalStorage::get::<String>(THEME_KEY)
        .ok()
        .filter(|theme| theme == "dark" || theme == "light")
        .unwrap_or_else(|| "light".to_string())
}

pub fn store_theme(theme: &str) {
    if let Err(e) = LocalStorage::set(THEME_KEY, theme) {
        log::warn!("Failed to persist theme: {:?}", e);
    }
}

pub fn apply_theme(theme: &str) {
    let Some(body) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.body())
    else {
        return;
    };

    let classes = body.class_list();
    let applied = if theme == "dark" {
        classes.add_1("dark-mode")
    } else {
        classes.remove_1("dark-mode")
    };
    if let Err(e) = applied {
        log::warn!("Failed to apply theme: {:?}", e);
    }
}

pub fn render_theme_toggle(theme: &str, link: &Scope<Model>) -> Html {
    html! {
        <button
            id="theme-toggle"
            class="theme-toggle"
            onclick={link.callback(|_| Msg::ToggleTheme)}
            title={ if theme == "light" { "Switch to Dark Mode" } else { "Switch to Light Mode" } }
        >
            { if theme == "light" {
                html! { <i class="fa-solid fa-sun toggle-icon"></i> }
            } else {
                html! { <i class="fa-solid fa-moon toggle-icon"></i> }
            }}
        </button>
    }
}

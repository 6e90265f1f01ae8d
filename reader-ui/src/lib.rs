//! Bộ điều khiển trình duyệt cho trang đọc feed đã render sẵn từ server.

#[cfg(target_arch = "wasm32")]
mod styles;

#[cfg(target_arch = "wasm32")]
mod wasm_ui {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use chrono::{Local, Utc};
    use serde::Deserialize;
    use serde_wasm_bindgen::from_value;
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use web_sys::{
        console, Document, Element, HtmlElement, KeyboardEvent, ScrollBehavior, ScrollToOptions,
        Window,
    };

    use reader_core::{
        format_clock_time, format_relative_time, parse_timestamp, shortcut_for, ReaderConfig,
        ShortcutAction,
    };

    use crate::styles;

    const HELP_MODAL_HTML: &str = r#"
<div class="reader-modal" role="dialog" aria-modal="true" aria-label="Keyboard shortcuts">
    <header class="reader-modal-header">
        <h2>Keyboard Shortcuts</h2>
        <button type="button" class="reader-modal-close" aria-label="Close help">&times;</button>
    </header>
    <dl class="reader-shortcut-list">
        <div class="reader-shortcut"><dt><kbd>R</kbd></dt><dd>Refresh feeds</dd></div>
        <div class="reader-shortcut"><dt><kbd>T</kbd></dt><dd>Scroll to top</dd></div>
        <div class="reader-shortcut"><dt><kbd>H</kbd></dt><dd>Show this help</dd></div>
        <div class="reader-shortcut"><dt><kbd>Esc</kbd></dt><dd>Close help</dd></div>
    </dl>
    <p class="reader-modal-note">
        Click on article summaries to expand them.<br/>
        The page auto-refreshes every 5 minutes.
    </p>
</div>
"#;

    #[derive(Deserialize)]
    struct JsPageConfig {
        #[serde(default)]
        relative_tick_secs: Option<u32>,
        #[serde(default)]
        auto_refresh_secs: Option<u32>,
    }

    impl From<JsPageConfig> for ReaderConfig {
        fn from(cfg: JsPageConfig) -> Self {
            let mut base = ReaderConfig::default();
            if let Some(secs) = cfg.relative_tick_secs {
                base.relative_tick_secs = secs;
            }
            if let Some(secs) = cfg.auto_refresh_secs {
                base.auto_refresh_secs = secs;
            }
            base
        }
    }

    /// Bộ điều khiển duy nhất của trang, sống suốt vòng đời document.
    struct PageController {
        window: Window,
        document: Document,
        config: ReaderConfig,
        tick_handles: RefCell<Vec<i32>>,
    }

    impl PageController {
        fn init(self: &Rc<Self>) -> Result<(), JsValue> {
            self.bind_header()?;
            self.bind_refresh_button()?;
            self.setup_expandable_summaries()?;
            self.update_relative_times();
            self.update_current_time();
            self.start_timers()?;
            self.setup_entry_animations()?;
            self.setup_keyboard_shortcuts()?;
            self.setup_accessibility()?;
            self.bind_lifecycle()?;
            Ok(())
        }

        fn bind_header(self: &Rc<Self>) -> Result<(), JsValue> {
            let Some(header) = self.document.query_selector(".feed-header")? else {
                return Ok(());
            };
            header.set_attribute("tabindex", "0")?;
            header.set_attribute("role", "button")?;
            header.set_attribute("aria-label", "Click to scroll to top")?;

            let controller = Rc::clone(self);
            let on_click =
                Closure::wrap(Box::new(move || controller.scroll_to_top()) as Box<dyn FnMut()>);
            header.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
            on_click.forget();
            Ok(())
        }

        fn bind_refresh_button(self: &Rc<Self>) -> Result<(), JsValue> {
            let Some(button) = self.document.get_element_by_id("refresh-btn") else {
                return Ok(());
            };
            let controller = Rc::clone(self);
            let on_click =
                Closure::wrap(Box::new(move || controller.manual_refresh()) as Box<dyn FnMut()>);
            button.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
            on_click.forget();
            Ok(())
        }

        fn setup_expandable_summaries(&self) -> Result<(), JsValue> {
            let nodes = self.document.query_selector_all(".summary-text")?;
            for index in 0..nodes.length() {
                let Some(element) = nodes
                    .item(index)
                    .and_then(|node| node.dyn_into::<HtmlElement>().ok())
                else {
                    continue;
                };
                let Some(full_text) = element.get_attribute("data-full-text") else {
                    continue;
                };
                let truncated = element.text_content().unwrap_or_default();
                if full_text.chars().count() <= truncated.chars().count() {
                    continue;
                }

                element.style().set_property("cursor", "pointer")?;
                element.set_title("Click to expand");
                element.set_attribute("tabindex", "0")?;
                element.set_attribute("role", "button")?;
                element.set_attribute("aria-expanded", "false")?;

                // Trạng thái mở/đóng sống cùng element, chia sẻ giữa hai listener.
                let expanded = Rc::new(Cell::new(false));
                let toggle: Rc<dyn Fn()> = {
                    let element = element.clone();
                    let expanded = Rc::clone(&expanded);
                    Rc::new(move || {
                        if expanded.get() {
                            element.set_text_content(Some(&truncated));
                            element.set_title("Click to expand");
                            let _ = element.set_attribute("aria-expanded", "false");
                            expanded.set(false);
                        } else {
                            element.set_text_content(Some(&full_text));
                            element.set_title("Click to collapse");
                            let _ = element.set_attribute("aria-expanded", "true");
                            expanded.set(true);
                        }
                    })
                };

                let on_click = {
                    let toggle = Rc::clone(&toggle);
                    Closure::wrap(Box::new(move || toggle()) as Box<dyn FnMut()>)
                };
                element
                    .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
                on_click.forget();

                let on_keydown = {
                    let toggle = Rc::clone(&toggle);
                    Closure::wrap(Box::new(move |event: KeyboardEvent| {
                        let key = event.key();
                        if key == "Enter" || key == " " {
                            event.prevent_default();
                            toggle();
                        }
                    }) as Box<dyn FnMut(KeyboardEvent)>)
                };
                element.add_event_listener_with_callback(
                    "keydown",
                    on_keydown.as_ref().unchecked_ref(),
                )?;
                on_keydown.forget();
            }
            Ok(())
        }

        fn update_relative_times(&self) {
            let Ok(nodes) = self
                .document
                .query_selector_all(".update-time[data-timestamp]")
            else {
                return;
            };
            let now = Utc::now();
            for index in 0..nodes.length() {
                let Some(element) = nodes
                    .item(index)
                    .and_then(|node| node.dyn_into::<Element>().ok())
                else {
                    continue;
                };
                let Some(raw) = element.get_attribute("data-timestamp") else {
                    continue;
                };
                if let Some(at) = parse_timestamp(&raw) {
                    element.set_text_content(Some(&format_relative_time(at, now)));
                }
            }
        }

        fn update_current_time(&self) {
            let Some(element) = self.document.get_element_by_id("current-time") else {
                return;
            };
            element.set_text_content(Some(&format_clock_time(&Local::now())));
        }

        fn start_timers(self: &Rc<Self>) -> Result<(), JsValue> {
            let controller = Rc::clone(self);
            let on_tick = Closure::wrap(Box::new(move || {
                controller.update_relative_times();
                controller.update_current_time();
            }) as Box<dyn FnMut()>);
            let handle = self.window.set_interval_with_callback_and_timeout_and_arguments_0(
                on_tick.as_ref().unchecked_ref(),
                interval_ms(self.config.relative_tick_secs),
            )?;
            on_tick.forget();
            self.tick_handles.borrow_mut().push(handle);

            let controller = Rc::clone(self);
            let on_refresh =
                Closure::wrap(Box::new(move || controller.auto_refresh()) as Box<dyn FnMut()>);
            let handle = self.window.set_interval_with_callback_and_timeout_and_arguments_0(
                on_refresh.as_ref().unchecked_ref(),
                interval_ms(self.config.auto_refresh_secs),
            )?;
            on_refresh.forget();
            self.tick_handles.borrow_mut().push(handle);
            Ok(())
        }

        fn auto_refresh(&self) {
            console::log_1(&"Auto-refreshing feeds...".into());
            self.reload_page();
        }

        fn manual_refresh(&self) {
            self.show_loading();
            console::log_1(&"Manual refresh triggered".into());
            self.reload_page();
        }

        fn reload_page(&self) {
            if let Err(err) = self.window.location().reload() {
                console::error_1(&err);
            }
        }

        fn scroll_to_top(&self) {
            let options = ScrollToOptions::new();
            options.set_top(0.0);
            options.set_behavior(ScrollBehavior::Smooth);
            self.window.scroll_to_with_scroll_to_options(&options);
        }

        fn setup_entry_animations(&self) -> Result<(), JsValue> {
            self.animate_group(".article-item", 20.0, 100, "all 0.5s ease")?;
            self.animate_group(".feed-card", 30.0, 200, "all 0.6s ease")?;
            Ok(())
        }

        fn animate_group(
            &self,
            selector: &str,
            offset_px: f64,
            step_ms: i32,
            transition: &str,
        ) -> Result<(), JsValue> {
            let nodes = self.document.query_selector_all(selector)?;
            for index in 0..nodes.length() {
                let Some(element) = nodes
                    .item(index)
                    .and_then(|node| node.dyn_into::<HtmlElement>().ok())
                else {
                    continue;
                };
                let style = element.style();
                style.set_property("opacity", "0")?;
                style.set_property("transform", &format!("translateY({offset_px}px)"))?;

                let transition = transition.to_string();
                let reveal = Closure::once(move || {
                    let style = element.style();
                    let _ = style.set_property("transition", &transition);
                    let _ = style.set_property("opacity", "1");
                    let _ = style.set_property("transform", "translateY(0)");
                });
                self.window.set_timeout_with_callback_and_timeout_and_arguments_0(
                    reveal.as_ref().unchecked_ref(),
                    step_ms.saturating_mul(index as i32),
                )?;
                reveal.forget();
            }
            Ok(())
        }

        fn setup_keyboard_shortcuts(self: &Rc<Self>) -> Result<(), JsValue> {
            let controller = Rc::clone(self);
            let on_keydown = Closure::wrap(Box::new(move |event: KeyboardEvent| {
                if event_targets_text_field(&event) {
                    return;
                }
                let has_modifier = event.ctrl_key() || event.meta_key();
                let Some(action) = shortcut_for(&event.key(), has_modifier) else {
                    return;
                };
                match action {
                    ShortcutAction::RefreshFeeds => {
                        event.prevent_default();
                        controller.manual_refresh();
                    }
                    ShortcutAction::ScrollToTop => {
                        event.prevent_default();
                        controller.scroll_to_top();
                    }
                    ShortcutAction::ShowHelp => {
                        event.prevent_default();
                        controller.show_help();
                    }
                    ShortcutAction::CloseHelp => controller.hide_help(),
                }
            }) as Box<dyn FnMut(KeyboardEvent)>);
            self.document
                .add_event_listener_with_callback("keydown", on_keydown.as_ref().unchecked_ref())?;
            on_keydown.forget();
            Ok(())
        }

        fn setup_accessibility(&self) -> Result<(), JsValue> {
            self.label_article_links()?;
            self.insert_skip_link()?;
            self.improve_focus_management()?;
            Ok(())
        }

        fn label_article_links(&self) -> Result<(), JsValue> {
            let links = self.document.query_selector_all(".article-title")?;
            for index in 0..links.length() {
                let Some(link) = links
                    .item(index)
                    .and_then(|node| node.dyn_into::<Element>().ok())
                else {
                    continue;
                };
                let Some(span) = link.query_selector("span")? else {
                    continue;
                };
                let title = span.text_content().unwrap_or_default();
                if title.is_empty() {
                    continue;
                }
                link.set_attribute("aria-label", &format!("Read article: {title}"))?;
            }
            Ok(())
        }

        fn insert_skip_link(&self) -> Result<(), JsValue> {
            let Some(body) = self.document.body() else {
                return Ok(());
            };
            let skip = self.document.create_element("a")?;
            skip.set_attribute("href", "#main-content")?;
            skip.set_class_name("reader-skip-link");
            skip.set_text_content(Some("Skip to main content"));
            body.insert_before(&skip, body.first_child().as_ref())?;

            if let Some(container) = self.document.query_selector(".container")? {
                container.set_id("main-content");
            }
            Ok(())
        }

        fn improve_focus_management(&self) -> Result<(), JsValue> {
            let cards = self.document.query_selector_all(".feed-card")?;
            for index in 0..cards.length() {
                let Some(card) = cards
                    .item(index)
                    .and_then(|node| node.dyn_into::<Element>().ok())
                else {
                    continue;
                };
                if card.query_selector(".article-title")?.is_some() {
                    card.set_attribute("tabindex", "-1")?;
                }
            }
            Ok(())
        }

        fn show_help(self: &Rc<Self>) {
            if self.document.get_element_by_id("help-modal").is_some() {
                return;
            }
            let Some(body) = self.document.body() else {
                return;
            };
            let Ok(host) = self.document.create_element("div") else {
                return;
            };
            host.set_id("help-modal");
            host.set_class_name("reader-modal-backdrop");
            host.set_inner_html(HELP_MODAL_HTML);
            if body.append_child(&host).is_err() {
                return;
            }

            if let Ok(Some(close)) = host.query_selector(".reader-modal-close") {
                let controller = Rc::clone(self);
                let on_close =
                    Closure::wrap(Box::new(move || controller.hide_help()) as Box<dyn FnMut()>);
                let _ = close
                    .add_event_listener_with_callback("click", on_close.as_ref().unchecked_ref());
                on_close.forget();
            }

            if let Ok(Some(dialog)) = host.query_selector(".reader-modal") {
                let _ = dialog.set_attribute("tabindex", "-1");
                if let Ok(dialog) = dialog.dyn_into::<HtmlElement>() {
                    let _ = dialog.focus();
                }
            }
        }

        fn hide_help(&self) {
            if let Some(modal) = self.document.get_element_by_id("help-modal") {
                modal.remove();
            }
        }

        fn show_loading(&self) {
            self.set_spinner_display("block");
        }

        fn hide_loading(&self) {
            self.set_spinner_display("none");
        }

        fn set_spinner_display(&self, value: &str) {
            let Ok(Some(node)) = self.document.query_selector(".loading-spinner") else {
                return;
            };
            if let Ok(spinner) = node.dyn_into::<HtmlElement>() {
                let _ = spinner.style().set_property("display", value);
            }
        }

        fn bind_lifecycle(self: &Rc<Self>) -> Result<(), JsValue> {
            // Cả hai interval bị hủy cùng nhau khi trang đóng.
            let controller = Rc::clone(self);
            let on_before_unload = Closure::wrap(Box::new(move || {
                controller.show_loading();
                controller.clear_timers();
            }) as Box<dyn FnMut()>);
            self.window.add_event_listener_with_callback(
                "beforeunload",
                on_before_unload.as_ref().unchecked_ref(),
            )?;
            on_before_unload.forget();

            let controller = Rc::clone(self);
            let on_load = Closure::wrap(Box::new(move || {
                controller.log_performance();
                controller.hide_loading();
            }) as Box<dyn FnMut()>);
            self.window
                .add_event_listener_with_callback("load", on_load.as_ref().unchecked_ref())?;
            on_load.forget();
            Ok(())
        }

        fn clear_timers(&self) {
            for handle in self.tick_handles.borrow_mut().drain(..) {
                self.window.clear_interval_with_handle(handle);
            }
        }

        fn log_performance(&self) {
            let Some(performance) = self.window.performance() else {
                return;
            };
            let timing = performance.timing();
            let load_time = timing.load_event_end() - timing.navigation_start();
            if load_time > 0.0 {
                console::log_1(&format!("Page loaded in {load_time}ms").into());
            }
        }
    }

    fn interval_ms(secs: u32) -> i32 {
        (u64::from(secs) * 1000).min(i32::MAX as u64) as i32
    }

    fn event_targets_text_field(event: &KeyboardEvent) -> bool {
        event
            .target()
            .and_then(|target| target.dyn_into::<Element>().ok())
            .map(|element| matches!(element.tag_name().as_str(), "INPUT" | "TEXTAREA"))
            .unwrap_or(false)
    }

    #[wasm_bindgen]
    pub fn mount_feed_reader(config: Option<JsValue>) -> Result<(), JsValue> {
        let window: Window =
            web_sys::window().ok_or_else(|| JsValue::from_str("Không có window"))?;
        let document: Document = window
            .document()
            .ok_or_else(|| JsValue::from_str("Không truy cập được document"))?;

        styles::ensure_styles(&document)?;

        let config = match config {
            Some(js_cfg) => {
                let cfg: JsPageConfig = from_value(js_cfg)
                    .map_err(|err| JsValue::from_str(&format!("Không đọc được config: {err}")))?;
                ReaderConfig::from(cfg)
            }
            None => ReaderConfig::default(),
        };

        let controller = Rc::new(PageController {
            window,
            document,
            config,
            tick_handles: RefCell::new(Vec::new()),
        });
        controller.init()
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_ui::mount_feed_reader;

#[cfg(not(target_arch = "wasm32"))]
pub fn mount_feed_reader(
    _: Option<wasm_bindgen::JsValue>,
) -> Result<(), wasm_bindgen::JsValue> {
    Err(wasm_bindgen::JsValue::from_str(
        "reader-ui chỉ hỗ trợ biên dịch target wasm32",
    ))
}

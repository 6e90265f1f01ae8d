#![cfg(target_arch = "wasm32")]

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Node};

const STYLE_TAG_SELECTOR: &str = "style[data-reader-ui]";

/// Default CSS for the elements the controller injects itself, with
/// easy-to-override design tokens. Server-rendered markup keeps its own
/// stylesheet.
pub const DEFAULT_STYLES: &str = r#"
:root {
  --reader-font-family: 'Inter', system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
  --reader-accent: #0b5394;
  --reader-accent-text: #f8fafc;
  --reader-backdrop: rgba(15, 23, 42, 0.5);
  --reader-card-bg: #ffffff;
  --reader-card-border: rgba(148, 163, 184, 0.28);
  --reader-radius: 14px;
  --reader-text: #1f2933;
  --reader-muted: #52606d;
  --reader-kbd-bg: #f1f5f9;
  --reader-kbd-border: rgba(71, 84, 103, 0.35);
  --reader-spinner-track: rgba(148, 163, 184, 0.35);
}

.reader-skip-link {
  position: absolute;
  top: 0;
  left: 0;
  z-index: 9999;
  padding: 10px 18px;
  border-radius: 0 0 var(--reader-radius) 0;
  background: var(--reader-accent);
  color: var(--reader-accent-text);
  font-family: var(--reader-font-family);
  font-weight: 600;
  text-decoration: none;
  transform: translateY(-100%);
  transition: transform 0.3s;
}

.reader-skip-link:focus {
  transform: translateY(0);
  outline: 2px solid var(--reader-accent-text);
  outline-offset: -4px;
}

.reader-modal-backdrop {
  position: fixed;
  inset: 0;
  z-index: 1050;
  display: flex;
  align-items: center;
  justify-content: center;
  background: var(--reader-backdrop);
}

.reader-modal {
  width: min(420px, calc(100vw - 32px));
  border-radius: var(--reader-radius);
  border: 1px solid var(--reader-card-border);
  background: var(--reader-card-bg);
  color: var(--reader-text);
  font-family: var(--reader-font-family);
  box-shadow: 0 24px 48px rgba(15, 23, 42, 0.2);
  padding: 20px 24px;
  outline: none;
}

.reader-modal-header {
  display: flex;
  align-items: center;
  justify-content: space-between;
  border-bottom: 1px solid var(--reader-card-border);
  padding-bottom: 12px;
  margin-bottom: 14px;
}

.reader-modal-header h2 {
  margin: 0;
  font-size: 1.05rem;
}

.reader-modal-close {
  border: 0;
  background: transparent;
  color: var(--reader-muted);
  font-size: 1.4rem;
  line-height: 1;
  cursor: pointer;
  padding: 2px 8px;
}

.reader-modal-close:hover {
  color: var(--reader-text);
}

.reader-shortcut-list {
  margin: 0;
  display: grid;
  gap: 8px;
}

.reader-shortcut {
  display: grid;
  grid-template-columns: 72px 1fr;
  align-items: center;
}

.reader-shortcut dt,
.reader-shortcut dd {
  margin: 0;
}

.reader-shortcut kbd {
  display: inline-block;
  min-width: 28px;
  padding: 2px 8px;
  border-radius: 6px;
  border: 1px solid var(--reader-kbd-border);
  background: var(--reader-kbd-bg);
  font-size: 0.82rem;
  text-align: center;
  box-shadow: inset 0 -1px 0 var(--reader-kbd-border);
}

.reader-modal-note {
  margin: 14px 0 0;
  padding-top: 12px;
  border-top: 1px solid var(--reader-card-border);
  color: var(--reader-muted);
  font-size: 0.82rem;
  line-height: 1.5;
}

.loading-spinner {
  display: none;
  width: 28px;
  height: 28px;
  border-radius: 50%;
  border: 3px solid var(--reader-spinner-track);
  border-top-color: var(--reader-accent);
  animation: reader-spin 0.8s linear infinite;
}

@keyframes reader-spin {
  to {
    transform: rotate(360deg);
  }
}

@media (max-width: 640px) {
  .reader-modal {
    padding: 16px;
  }

  .reader-shortcut {
    grid-template-columns: 56px 1fr;
  }
}
"#;

pub fn ensure_styles(document: &Document) -> Result<(), JsValue> {
    if document.query_selector(STYLE_TAG_SELECTOR)?.is_some() {
        return Ok(());
    }

    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("Document không có thẻ <head>"))?;

    let style_el = document.create_element("style")?;
    style_el.set_attribute("data-reader-ui", "v1")?;
    style_el.set_text_content(Some(DEFAULT_STYLES));
    head.append_child(&style_el.clone().dyn_into::<Node>()?)?;

    Ok(())
}

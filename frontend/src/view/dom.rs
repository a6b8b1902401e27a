use std::rc::Rc;
use futures::future::LocalBoxFuture;
use js_sys::wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{window, Document, HtmlDocument, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement, Window};

use super::{Element, Field, Form, Host, Node};
use crate::utils::server::AppError;

const REQUIRED_FIELDS: &str = "input[required], textarea[required], select[required]";

fn js_err(e: JsValue) -> AppError {
  AppError::Wasm(format!("{:?}", e))
}

/// A `web_sys::Element` seen through the dashboard's element traits.
pub struct DomElement(pub web_sys::Element);

impl Element for DomElement {
  fn set_class_name(&self, class_name: &str) {
    self.0.set_class_name(class_name);
  }

  fn add_class(&self, class: &str) {
    let _ = self.0.class_list().add_1(class);
  }

  fn remove_class(&self, class: &str) {
    let _ = self.0.class_list().remove_1(class);
  }

  fn set_text(&self, text: &str) {
    self.0.set_text_content(Some(text));
  }

  fn set_inner_html(&self, html: &str) {
    self.0.set_inner_html(html);
  }

  fn set_style(&self, property: &str, value: &str) {
    if let Some(el) = self.0.dyn_ref::<web_sys::HtmlElement>() {
      let _ = el.style().set_property(property, value);
    }
  }

  fn is_attached(&self) -> bool {
    self.0.parent_node().is_some()
  }

  fn remove(&self) {
    self.0.remove();
  }
}

impl Field for DomElement {
  fn value(&self) -> String {
    if let Some(input) = self.0.dyn_ref::<HtmlInputElement>() {
      input.value()
    } else if let Some(area) = self.0.dyn_ref::<HtmlTextAreaElement>() {
      area.value()
    } else if let Some(select) = self.0.dyn_ref::<HtmlSelectElement>() {
      select.value()
    } else {
      String::new()
    }
  }
}

impl Form for DomElement {
  fn required_fields(&self) -> Vec<Rc<dyn Field>> {
    let Ok(nodes) = self.0.query_selector_all(REQUIRED_FIELDS) else {
      return vec![];
    };
    (0..nodes.length())
      .filter_map(|i| nodes.item(i))
      .filter_map(|n| n.dyn_into::<web_sys::Element>().ok())
      .map(|el| Rc::new(DomElement(el)) as Rc<dyn Field>)
      .collect()
  }

  fn entries(&self) -> Vec<(String, String)> {
    let Some(form) = self.0.dyn_ref::<web_sys::HtmlFormElement>() else {
      return vec![];
    };
    let Ok(data) = web_sys::FormData::new_with_form(form) else {
      return vec![];
    };
    let Ok(Some(iter)) = js_sys::try_iter(&data) else {
      return vec![];
    };
    iter
      .filter_map(Result::ok)
      .filter_map(|entry| {
        let pair = entry.dyn_into::<js_sys::Array>().ok()?;
        // file inputs yield File objects, which have no string form
        Some((pair.get(0).as_string()?, pair.get(1).as_string()?))
      })
      .collect()
  }

  fn on_submit(&self, handler: Box<dyn Fn()>) {
    let cb = Closure::<dyn FnMut(web_sys::Event)>::new(move |evt: web_sys::Event| {
      evt.prevent_default();
      handler();
    });
    let _ = self.0.add_event_listener_with_callback("submit", cb.as_ref().unchecked_ref());
    // the listener lives as long as the page
    cb.forget();
  }
}

pub struct DomHost {
  window: Window,
  document: Document,
}

impl DomHost {
  pub fn new() -> Result<Self, AppError> {
    let window = window().ok_or_else(|| AppError::Dom("no global window".to_string()))?;
    let document = window.document().ok_or_else(|| AppError::Dom("window has no document".to_string()))?;
    Ok(Self { window, document })
  }

  /// `scheme://host` of the current page.
  pub fn origin(&self) -> Result<String, AppError> {
    self.window.location().origin().map_err(js_err)
  }

  fn body(&self) -> Result<web_sys::HtmlElement, AppError> {
    self.document.body().ok_or_else(|| AppError::Dom("document has no body".to_string()))
  }
}

impl Host for DomHost {
  fn element_by_id(&self, id: &str) -> Option<Node> {
    self.document.get_element_by_id(id).map(|el| Rc::new(DomElement(el)) as Node)
  }

  fn form_by_id(&self, id: &str) -> Option<Rc<dyn Form>> {
    self.document.get_element_by_id(id).map(|el| Rc::new(DomElement(el)) as Rc<dyn Form>)
  }

  fn append_element(&self, tag: &str) -> Result<Node, AppError> {
    let el = self.document.create_element(tag).map_err(js_err)?;
    self.body()?.append_child(&el).map_err(js_err)?;
    Ok(Rc::new(DomElement(el)))
  }

  fn append_scratch_text(&self, text: &str) -> Result<Node, AppError> {
    let area = self.document.create_element("textarea").map_err(js_err)?
      .dyn_into::<HtmlTextAreaElement>()
      .map_err(|_| AppError::Dom("textarea is not an HtmlTextAreaElement".to_string()))?;
    area.set_value(text);
    let style = area.style();
    let _ = style.set_property("position", "fixed");
    let _ = style.set_property("left", "-9999px");
    self.body()?.append_child(&area).map_err(js_err)?;
    area.select();
    Ok(Rc::new(DomElement(area.unchecked_into())))
  }

  fn write_clipboard(&self, text: &str) -> LocalBoxFuture<'static, Result<(), AppError>> {
    let navigator = self.window.navigator();
    let text = text.to_string();
    Box::pin(async move {
      // insecure contexts have no navigator.clipboard at all
      let present = js_sys::Reflect::get(&navigator, &JsValue::from_str("clipboard"))
        .map(|v| !v.is_undefined())
        .unwrap_or(false);
      if !present {
        return Err(AppError::Clipboard("clipboard API unavailable".to_string()));
      }
      JsFuture::from(navigator.clipboard().write_text(&text))
        .await
        .map(|_| ())
        .map_err(|e| AppError::Clipboard(format!("{:?}", e)))
    })
  }

  fn exec_copy(&self) -> Result<(), AppError> {
    let doc = self.document.dyn_ref::<HtmlDocument>()
      .ok_or_else(|| AppError::Dom("document is not an HtmlDocument".to_string()))?;
    match doc.exec_command("copy") {
      Ok(true) => Ok(()),
      Ok(false) => Err(AppError::Clipboard("copy command was not executed".to_string())),
      Err(e) => Err(AppError::Clipboard(format!("{:?}", e))),
    }
  }

  fn confirm(&self, message: &str) -> bool {
    self.window.confirm_with_message(message).unwrap_or(false)
  }
}

// In-memory page used by the controller tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use futures::future::LocalBoxFuture;

use super::{Element, Field, Form, Host, Node};
use crate::utils::server::AppError;

#[derive(Default)]
pub struct FakeNode {
  pub tag: String,
  class_name: RefCell<String>,
  text: RefCell<String>,
  html: RefCell<String>,
  styles: RefCell<HashMap<String, String>>,
  detached: Cell<bool>,
  value: RefCell<String>,
}

impl FakeNode {
  pub fn new(tag: &str) -> Rc<Self> {
    Rc::new(Self { tag: tag.to_string(), ..Default::default() })
  }

  pub fn with_value(tag: &str, value: &str) -> Rc<Self> {
    let node = Self::new(tag);
    *node.value.borrow_mut() = value.to_string();
    node
  }

  pub fn classes(&self) -> Vec<String> {
    self.class_name.borrow().split_whitespace().map(str::to_string).collect()
  }

  pub fn has_class(&self, class: &str) -> bool {
    self.classes().iter().any(|c| c == class)
  }

  pub fn text(&self) -> String {
    self.text.borrow().clone()
  }

  pub fn html(&self) -> String {
    self.html.borrow().clone()
  }

  pub fn style(&self, property: &str) -> Option<String> {
    self.styles.borrow().get(property).cloned()
  }

  pub fn value(&self) -> String {
    self.value.borrow().clone()
  }
}

impl Element for FakeNode {
  fn set_class_name(&self, class_name: &str) {
    *self.class_name.borrow_mut() = class_name.to_string();
  }

  fn add_class(&self, class: &str) {
    if !self.has_class(class) {
      let mut classes = self.classes();
      classes.push(class.to_string());
      *self.class_name.borrow_mut() = classes.join(" ");
    }
  }

  fn remove_class(&self, class: &str) {
    let classes: Vec<String> = self.classes().into_iter().filter(|c| c != class).collect();
    *self.class_name.borrow_mut() = classes.join(" ");
  }

  fn set_text(&self, text: &str) {
    *self.text.borrow_mut() = text.to_string();
  }

  fn set_inner_html(&self, html: &str) {
    *self.html.borrow_mut() = html.to_string();
  }

  fn set_style(&self, property: &str, value: &str) {
    self.styles.borrow_mut().insert(property.to_string(), value.to_string());
  }

  fn is_attached(&self) -> bool {
    !self.detached.get()
  }

  fn remove(&self) {
    self.detached.set(true);
  }
}

impl Field for FakeNode {
  fn value(&self) -> String {
    self.value.borrow().clone()
  }
}

#[derive(Default)]
pub struct FakeForm {
  pub node: FakeNode,
  pub required: Vec<Rc<FakeNode>>,
  pub entries: Vec<(String, String)>,
  handler: RefCell<Option<Box<dyn Fn()>>>,
  pub loading_seen: Cell<bool>,
}

impl FakeForm {
  pub fn new(required: Vec<Rc<FakeNode>>, entries: &[(&str, &str)]) -> Rc<Self> {
    Rc::new(Self {
      required,
      entries: entries.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
      ..Default::default()
    })
  }

  pub fn is_loading(&self) -> bool {
    self.node.has_class("loading")
  }

  /// Fires the installed submit handler, if any.
  pub fn submit(&self) -> bool {
    match self.handler.borrow().as_ref() {
      Some(handler) => {
        handler();
        true
      }
      None => false,
    }
  }
}

impl Element for FakeForm {
  fn set_class_name(&self, class_name: &str) {
    self.node.set_class_name(class_name)
  }
  fn add_class(&self, class: &str) {
    if class == "loading" {
      self.loading_seen.set(true);
    }
    self.node.add_class(class)
  }
  fn remove_class(&self, class: &str) {
    self.node.remove_class(class)
  }
  fn set_text(&self, text: &str) {
    self.node.set_text(text)
  }
  fn set_inner_html(&self, html: &str) {
    self.node.set_inner_html(html)
  }
  fn set_style(&self, property: &str, value: &str) {
    self.node.set_style(property, value)
  }
  fn is_attached(&self) -> bool {
    self.node.is_attached()
  }
  fn remove(&self) {
    self.node.remove()
  }
}

impl Form for FakeForm {
  fn required_fields(&self) -> Vec<Rc<dyn Field>> {
    self.required.iter().map(|f| f.clone() as Rc<dyn Field>).collect()
  }

  fn entries(&self) -> Vec<(String, String)> {
    self.entries.clone()
  }

  fn on_submit(&self, handler: Box<dyn Fn()>) {
    *self.handler.borrow_mut() = Some(handler);
  }
}

pub struct FakeHost {
  ids: RefCell<HashMap<String, Rc<FakeNode>>>,
  forms: RefCell<HashMap<String, Rc<FakeForm>>>,
  pub body: RefCell<Vec<Rc<FakeNode>>>,
  pub clipboard_ok: Cell<bool>,
  pub exec_copy_ok: Cell<bool>,
  pub confirm_answer: Cell<bool>,
  pub clipboard: RefCell<Vec<String>>,
  pub prompts: RefCell<Vec<String>>,
}

impl Default for FakeHost {
  fn default() -> Self {
    Self {
      ids: RefCell::default(),
      forms: RefCell::default(),
      body: RefCell::default(),
      clipboard_ok: Cell::new(true),
      exec_copy_ok: Cell::new(true),
      confirm_answer: Cell::new(true),
      clipboard: RefCell::default(),
      prompts: RefCell::default(),
    }
  }
}

impl FakeHost {
  pub fn new() -> Rc<Self> {
    Rc::new(Self::default())
  }

  /// A host with every status node the dashboard binds to.
  pub fn with_status_nodes() -> Rc<Self> {
    let host = Self::new();
    for id in [
      super::STATUS_INDICATOR,
      super::STATUS_TEXT,
      super::MASTER_STATUS,
      super::CHILD_COUNT,
      super::TRADING_STATUS,
      super::LAST_UPDATE,
    ] {
      host.insert(id);
    }
    host
  }

  pub fn insert(&self, id: &str) -> Rc<FakeNode> {
    let node = FakeNode::new("div");
    self.ids.borrow_mut().insert(id.to_string(), node.clone());
    node
  }

  pub fn insert_form(&self, id: &str, form: Rc<FakeForm>) {
    self.forms.borrow_mut().insert(id.to_string(), form);
  }

  pub fn node(&self, id: &str) -> Rc<FakeNode> {
    self.ids.borrow().get(id).cloned().expect("node registered")
  }

  /// Body children that are still attached.
  pub fn attached(&self) -> Vec<Rc<FakeNode>> {
    self.body.borrow().iter().filter(|n| n.is_attached()).cloned().collect()
  }
}

impl Host for FakeHost {
  fn element_by_id(&self, id: &str) -> Option<Node> {
    self.ids.borrow().get(id).map(|n| n.clone() as Node)
  }

  fn form_by_id(&self, id: &str) -> Option<Rc<dyn Form>> {
    self.forms.borrow().get(id).map(|f| f.clone() as Rc<dyn Form>)
  }

  fn append_element(&self, tag: &str) -> Result<Node, AppError> {
    let node = FakeNode::new(tag);
    self.body.borrow_mut().push(node.clone());
    Ok(node)
  }

  fn append_scratch_text(&self, text: &str) -> Result<Node, AppError> {
    let node = FakeNode::with_value("textarea", text);
    self.body.borrow_mut().push(node.clone());
    Ok(node)
  }

  fn write_clipboard(&self, text: &str) -> LocalBoxFuture<'static, Result<(), AppError>> {
    let result = if self.clipboard_ok.get() {
      self.clipboard.borrow_mut().push(text.to_string());
      Ok(())
    } else {
      Err(AppError::Clipboard("permission denied".to_string()))
    };
    Box::pin(async move { result })
  }

  fn exec_copy(&self) -> Result<(), AppError> {
    if !self.exec_copy_ok.get() {
      return Err(AppError::Clipboard("copy command rejected".to_string()));
    }
    let selected = self.body.borrow().iter().rev()
      .find(|n| n.tag == "textarea" && n.is_attached())
      .map(|n| n.value());
    if let Some(text) = selected {
      self.clipboard.borrow_mut().push(text);
    }
    Ok(())
  }

  fn confirm(&self, message: &str) -> bool {
    self.prompts.borrow_mut().push(message.to_string());
    self.confirm_answer.get()
  }
}

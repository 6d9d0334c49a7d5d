//! Browser host: LocalStorage, the routine form and `fetch`

use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Document, Element, Headers, HtmlButtonElement, HtmlInputElement, HtmlSelectElement, Request,
    RequestInit, RequestMode, Response, Storage,
};

use crate::api::CompletionClient;
use crate::config::ApiConfig;
use crate::error::{Result, RoutineError};
use crate::form::{Field, FormView, SUBMIT_MARKUP, WORKING_CAPTION, must_wait_for_dom};
use crate::handler::RoutineHandler;
use crate::preferences::RoutinePreferences;
use crate::prompt::ChatCompletionRequest;
use crate::storage::KeyValueStore;

const FORM_ID: &str = "routineForm";
const RESULT_ID: &str = "result";
const OUTPUT_ID: &str = "routineOutput";
const SUBMIT_SELECTOR: &str = r#"button[type="submit"]"#;
const ACTIVITY_SELECTOR: &str = r#"input[name="activities"]"#;
const HIDDEN_CLASS: &str = "hidden";

/// Best-effort readable text for a thrown JS value
fn js_error(err: JsValue) -> String {
    if let Some(e) = err.dyn_ref::<js_sys::Error>() {
        return String::from(e.message());
    }
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}

fn storage_error(err: JsValue) -> RoutineError {
    RoutineError::Storage(js_error(err))
}

fn transport_error(err: JsValue) -> RoutineError {
    RoutineError::Transport(js_error(err))
}

/// `window.localStorage`
pub struct LocalStore {
    storage: Storage,
}

impl LocalStore {
    pub fn open() -> Result<Self> {
        let storage = web_sys::window()
            .ok_or_else(|| RoutineError::Host("no window".into()))?
            .local_storage()
            .map_err(storage_error)?
            .ok_or_else(|| RoutineError::Storage("LocalStorage is unavailable".into()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage.get_item(key).map_err(storage_error)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.storage.set_item(key, value).map_err(storage_error)
    }
}

/// A single-value control; the page may use a select or an input
enum Control {
    Select(HtmlSelectElement),
    Input(HtmlInputElement),
}

impl Control {
    fn find(document: &Document, id: &'static str) -> Result<Self> {
        let el = document
            .get_element_by_id(id)
            .ok_or(RoutineError::MissingElement(id))?;
        match el.dyn_into::<HtmlSelectElement>() {
            Ok(select) => Ok(Control::Select(select)),
            Err(el) => el
                .dyn_into::<HtmlInputElement>()
                .map(Control::Input)
                .map_err(|_| RoutineError::MissingElement(id)),
        }
    }

    fn value(&self) -> String {
        match self {
            Control::Select(el) => el.value(),
            Control::Input(el) => el.value(),
        }
    }

    fn set_value(&self, value: &str) {
        match self {
            Control::Select(el) => el.set_value(value),
            Control::Input(el) => el.set_value(value),
        }
    }
}

/// The routine form, resolved once at startup
pub struct DomForm {
    document: Document,
    time_of_day: Control,
    focus_area: Control,
    time_available: Control,
    energy_level: Control,
    submit: HtmlButtonElement,
    result: Element,
    output: Element,
}

impl DomForm {
    pub fn from_document(document: &Document) -> Result<Self> {
        let submit = document
            .query_selector(SUBMIT_SELECTOR)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
            .ok_or(RoutineError::MissingElement(SUBMIT_SELECTOR))?;

        Ok(Self {
            document: document.clone(),
            time_of_day: Control::find(document, Field::TimeOfDay.element_id())?,
            focus_area: Control::find(document, Field::FocusArea.element_id())?,
            time_available: Control::find(document, Field::TimeAvailable.element_id())?,
            energy_level: Control::find(document, Field::EnergyLevel.element_id())?,
            submit,
            result: document
                .get_element_by_id(RESULT_ID)
                .ok_or(RoutineError::MissingElement(RESULT_ID))?,
            output: document
                .get_element_by_id(OUTPUT_ID)
                .ok_or(RoutineError::MissingElement(OUTPUT_ID))?,
        })
    }

    fn control(&self, field: Field) -> &Control {
        match field {
            Field::TimeOfDay => &self.time_of_day,
            Field::FocusArea => &self.focus_area,
            Field::TimeAvailable => &self.time_available,
            Field::EnergyLevel => &self.energy_level,
        }
    }

    /// Activity checkboxes in document order
    fn activity_inputs(&self) -> Vec<HtmlInputElement> {
        let Ok(nodes) = self.document.query_selector_all(ACTIVITY_SELECTOR) else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<HtmlInputElement>().ok())
            .collect()
    }
}

impl FormView for DomForm {
    fn form_values(&self) -> RoutinePreferences {
        RoutinePreferences {
            time_of_day: self.time_of_day.value(),
            focus_area: self.focus_area.value(),
            time_available: self.time_available.value(),
            energy_level: self.energy_level.value(),
            activities: self
                .activity_inputs()
                .into_iter()
                .filter(|cb| cb.checked())
                .map(|cb| cb.value())
                .collect(),
        }
    }

    fn set_field(&self, field: Field, value: &str) {
        self.control(field).set_value(value);
    }

    fn activity_options(&self) -> Vec<String> {
        self.activity_inputs().iter().map(|cb| cb.value()).collect()
    }

    fn set_activity_checked(&self, value: &str, checked: bool) {
        for cb in self.activity_inputs() {
            if cb.value() == value {
                cb.set_checked(checked);
            }
        }
    }

    fn show_working(&self) {
        self.submit.set_text_content(Some(WORKING_CAPTION));
        self.submit.set_disabled(true);
    }

    fn restore_submit(&self) {
        // Markup, not text: the caption carries an icon
        self.submit.set_inner_html(SUBMIT_MARKUP);
        self.submit.set_disabled(false);
    }

    fn render_result(&self, routine: &str) {
        let _ = self.result.class_list().remove_1(HIDDEN_CLASS);
        self.output.set_text_content(Some(routine));
    }

    fn render_error(&self, message: &str) {
        self.output.set_text_content(Some(message));
    }
}

/// Chat-completion client on top of `window.fetch`
pub struct FetchClient {
    endpoint: String,
}

impl FetchClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl CompletionClient for FetchClient {
    async fn complete(&self, api_key: &str, request: &ChatCompletionRequest) -> Result<String> {
        let body = serde_json::to_string(request)?;

        let headers = Headers::new().map_err(transport_error)?;
        headers
            .set("Content-Type", "application/json")
            .map_err(transport_error)?;
        headers
            .set("Authorization", &format!("Bearer {}", api_key))
            .map_err(transport_error)?;

        let init = RequestInit::new();
        init.set_method("POST");
        init.set_mode(RequestMode::Cors);
        init.set_headers(&headers);
        init.set_body(&JsValue::from_str(&body));

        let request =
            Request::new_with_str_and_init(&self.endpoint, &init).map_err(transport_error)?;
        let window = web_sys::window().ok_or_else(|| RoutineError::Host("no window".into()))?;

        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(transport_error)?
            .dyn_into()
            .map_err(transport_error)?;
        log::debug!("Chat completion answered with status {}", response.status());

        let text = JsFuture::from(response.text().map_err(transport_error)?)
            .await
            .map_err(transport_error)?;
        text.as_string()
            .ok_or_else(|| RoutineError::Transport("response body is not text".into()))
    }
}

/// Wire the page once its markup is available.
///
/// While the document is still loading this only registers a
/// `DOMContentLoaded` listener; wiring errors then go to the log.
pub fn start() -> Result<()> {
    let window = web_sys::window().ok_or_else(|| RoutineError::Host("no window".into()))?;
    let document = window
        .document()
        .ok_or_else(|| RoutineError::Host("no document".into()))?;

    if !must_wait_for_dom(&document.ready_state()) {
        return wire_form(&document);
    }

    let document_clone = document.clone();
    let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
        if let Err(err) = wire_form(&document_clone) {
            log::error!("Could not set up routine form: {}", err);
        }
    });
    document
        .add_event_listener_with_callback("DOMContentLoaded", closure.as_ref().unchecked_ref())
        .map_err(|e| RoutineError::Host(js_error(e)))?;
    closure.forget();

    log::info!("Waiting for DOMContentLoaded");
    Ok(())
}

/// Restore saved preferences and hook the form's submit event.
///
/// Errors here are the page's uncaught faults: a missing element, storage
/// that cannot be opened, or a stored record that does not parse.
fn wire_form(document: &Document) -> Result<()> {
    let config = ApiConfig::from_window();
    let client = FetchClient::new(config.endpoint.clone());
    let handler = Rc::new(RoutineHandler::new(
        LocalStore::open()?,
        DomForm::from_document(document)?,
        client,
        config,
    ));

    if handler.load_preferences()? {
        log::info!("Form restored from saved preferences");
    }

    let form = document
        .get_element_by_id(FORM_ID)
        .ok_or(RoutineError::MissingElement(FORM_ID))?;

    let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
        event.prevent_default();
        let handler = handler.clone();
        // The task reads the form and disables the button before the next UI event is dispatched
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(err) = handler.submit().await {
                log::error!("Uncaught error in submit handler: {}", err);
            }
        });
    });
    form.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref())
        .map_err(|e| RoutineError::Host(js_error(e)))?;
    closure.forget();

    log::info!("Routine form ready");
    Ok(())
}

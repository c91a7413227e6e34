//! Page elements and view synchronisation
//!
//! [`Elements`] binds every element the controller touches once at mount
//! time. [`Elements::sync`] copies controller state into the DOM; it is the
//! only place that writes to the page.

use rephrase_core::{Action, AnalysisOptions, Controller, ResultView, StatsCounters};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, HtmlButtonElement, HtmlElement, HtmlInputElement, HtmlSelectElement,
    HtmlTextAreaElement,
};

pub const PAGE_TITLE_ID: &str = "page-title";
pub const INPUT_ID: &str = "inputText";
pub const WORD_COUNT_ID: &str = "wordCount";
pub const SUBMIT_ID: &str = "processButton";
pub const RESULTS_ID: &str = "results-container";
pub const PLACEHOLDER_ID: &str = "output-placeholder";
pub const LOADER_ID: &str = "loader";
pub const ERROR_ID: &str = "error-message";
pub const OPTIONS_ID: &str = "options-wrapper";
pub const TONE_ID: &str = "tone";
pub const COMPLEXITY_ID: &str = "complexity";
pub const DIALECT_ID: &str = "dialect";
pub const FREEZE_KEYWORDS_ID: &str = "freezeKeywords";

pub const NAV_LINK_SELECTOR: &str = ".nav-link";
pub const ACTION_ATTR: &str = "data-action";

pub const HIDDEN_CLASS: &str = "hidden";
pub const ACTIVE_CLASS: &str = "active";
pub const LIMIT_EXCEEDED_CLASS: &str = "limit-exceeded";

/// Element id of the live counter for `action`.
pub fn stat_element_id(action: Action) -> String {
    format!("stat-{}", action.as_str())
}

/// Look up an element by id and cast it to `T`.
pub fn by_id<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element #{}", id)))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Element #{} has an unexpected type", id)))
}

/// A navigation link and the action it selects
#[derive(Clone)]
pub struct NavLink {
    pub element: HtmlElement,
    pub action: Action,
}

#[derive(Clone)]
pub struct Elements {
    pub page_title: HtmlElement,
    pub input: HtmlTextAreaElement,
    pub word_count: HtmlElement,
    pub submit: HtmlButtonElement,
    pub results: HtmlElement,
    pub placeholder: HtmlElement,
    pub loader: HtmlElement,
    pub error: HtmlElement,
    pub options: HtmlElement,
    pub tone: HtmlSelectElement,
    pub complexity: HtmlSelectElement,
    pub dialect: HtmlSelectElement,
    pub freeze_keywords: HtmlInputElement,
    pub nav_links: Vec<NavLink>,
    /// Counters present on the page; pages may omit any of them
    pub stats: Vec<(Action, HtmlElement)>,
}

impl Elements {
    pub fn bind(document: &Document) -> Result<Self, JsValue> {
        Ok(Self {
            page_title: by_id(document, PAGE_TITLE_ID)?,
            input: by_id(document, INPUT_ID)?,
            word_count: by_id(document, WORD_COUNT_ID)?,
            submit: by_id(document, SUBMIT_ID)?,
            results: by_id(document, RESULTS_ID)?,
            placeholder: by_id(document, PLACEHOLDER_ID)?,
            loader: by_id(document, LOADER_ID)?,
            error: by_id(document, ERROR_ID)?,
            options: by_id(document, OPTIONS_ID)?,
            tone: by_id(document, TONE_ID)?,
            complexity: by_id(document, COMPLEXITY_ID)?,
            dialect: by_id(document, DIALECT_ID)?,
            freeze_keywords: by_id(document, FREEZE_KEYWORDS_ID)?,
            nav_links: bind_nav_links(document)?,
            stats: Action::ALL
                .into_iter()
                .filter_map(|action| {
                    by_id::<HtmlElement>(document, &stat_element_id(action))
                        .ok()
                        .map(|el| (action, el))
                })
                .collect(),
        })
    }

    /// Current values of the rewrite option controls.
    pub fn read_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            tone: self.tone.value(),
            complexity: self.complexity.value(),
            dialect: self.dialect.value(),
            freeze_keywords: self.freeze_keywords.value(),
        }
    }

    pub fn sync(&self, controller: &Controller) -> Result<(), JsValue> {
        let action = controller.action();

        self.page_title.set_text_content(Some(controller.page_title()));
        self.input.set_placeholder(controller.placeholder());
        for link in &self.nav_links {
            link.element
                .class_list()
                .toggle_with_force(ACTIVE_CLASS, link.action == action)?;
        }

        self.options
            .class_list()
            .toggle_with_force(HIDDEN_CLASS, !controller.options_visible())?;

        self.word_count.set_text_content(Some(&controller.counter_label()));
        self.word_count
            .class_list()
            .toggle_with_force(LIMIT_EXCEEDED_CLASS, controller.over_limit())?;

        self.submit.set_text_content(Some(controller.submit_label()));
        self.submit.set_disabled(controller.submit_disabled());
        self.submit
            .class_list()
            .toggle_with_force(HIDDEN_CLASS, controller.is_loading())?;
        self.loader
            .class_list()
            .toggle_with_force(HIDDEN_CLASS, !controller.is_loading())?;

        self.placeholder
            .class_list()
            .toggle_with_force(HIDDEN_CLASS, !controller.placeholder_visible())?;

        match controller.view() {
            ResultView::Rendered(html) => {
                self.results.set_inner_html(html);
                self.error.set_text_content(None);
            }
            ResultView::Failed(message) => {
                self.results.set_inner_html("");
                // Plain text only, error strings are never markup.
                self.error.set_text_content(Some(message));
            }
            ResultView::Empty | ResultView::Loading => {
                self.results.set_inner_html("");
                self.error.set_text_content(None);
            }
        }

        Ok(())
    }

    pub fn sync_stats(&self, counters: &StatsCounters) {
        for (action, element) in &self.stats {
            element.set_text_content(Some(&counters.get(*action).to_string()));
        }
    }
}

fn bind_nav_links(document: &Document) -> Result<Vec<NavLink>, JsValue> {
    let nodes = document.query_selector_all(NAV_LINK_SELECTOR)?;
    let mut links = Vec::with_capacity(nodes.length() as usize);
    for i in 0..nodes.length() {
        let Some(node) = nodes.get(i) else { continue };
        let Ok(element) = node.dyn_into::<HtmlElement>() else {
            continue;
        };
        let Some(action) = element
            .get_attribute(ACTION_ATTR)
            .and_then(|name| name.parse::<Action>().ok())
        else {
            tracing::warn!("Navigation link without a valid data-action");
            continue;
        };
        links.push(NavLink { element, action });
    }
    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_element_ids() {
        let ids: Vec<String> = Action::ALL.into_iter().map(stat_element_id).collect();
        assert_eq!(
            ids,
            vec!["stat-humanize", "stat-detect", "stat-plagiarize", "stat-research"]
        );
    }
}

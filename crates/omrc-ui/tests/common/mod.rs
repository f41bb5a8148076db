//! Shared page fixture for the integration tests.
//!
//! Mirrors the structure of the enrollment page: a nav bar with a
//! three-bar toggle, program cards, and the enrollment form with its
//! financing and consent checkboxes.

#![allow(dead_code)]

use omrc_ui::{Dom, MemoryDom, NodeId};

pub struct Page {
    pub dom: MemoryDom,
    pub toggle: NodeId,
    pub bars: Vec<NodeId>,
    pub menu: NodeId,
    pub menu_item: NodeId,
    pub programs_link: NodeId,
    pub external_link: NodeId,
    pub programs: NodeId,
    pub cards: Vec<NodeId>,
    pub form: NodeId,
    pub first_name: NodeId,
    pub email: NodeId,
    pub phone: NodeId,
    pub id_number: NodeId,
    pub program: NodeId,
    pub notes: NodeId,
    pub financing: Vec<NodeId>,
    pub declaration: NodeId,
    pub privacy: NodeId,
    pub submit: NodeId,
}

/// Show component logs in failing tests (`cargo test -- --nocapture`)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

impl Page {
    pub fn new() -> Self {
        init_tracing();
        let dom = MemoryDom::new();
        let body = dom.body_node();

        let nav = dom.element(body, "nav", &[("class", "navbar")]);
        let toggle = dom.element(nav, "button", &[("class", "nav-toggle")]);
        let bars = (0..3).map(|_| dom.element(toggle, "span", &[])).collect();
        let menu = dom.element(nav, "ul", &[("class", "nav-menu")]);
        let menu_item = dom.element(menu, "li", &[]);
        let programs_link = dom.element(menu_item, "a", &[("href", "#programs")]);
        let item = dom.element(menu, "li", &[]);
        let external_link = dom.element(item, "a", &[("href", "apply.html")]);

        let programs = dom.element(body, "section", &[("id", "programs")]);
        let cards = vec![
            dom.element(programs, "div", &[("class", "program-card")]),
            dom.element(programs, "div", &[("class", "program-card")]),
            dom.element(programs, "div", &[("class", "feature-card")]),
        ];

        let form = dom.element(body, "form", &[("id", "enrollmentForm")]);
        let personal = dom.element(form, "div", &[("class", "form-section")]);
        let first_name = Self::group(&dom, personal, "input", &[("id", "firstName"), ("type", "text"), ("required", "")]);
        let email = Self::group(&dom, personal, "input", &[("id", "email"), ("type", "email"), ("required", "")]);
        let phone = Self::group(&dom, personal, "input", &[("id", "phone"), ("type", "tel"), ("required", "")]);
        let id_number = Self::group(&dom, personal, "input", &[("id", "idNumber"), ("type", "text")]);
        let program = Self::group(&dom, personal, "select", &[("id", "program"), ("required", "")]);
        let notes = Self::group(&dom, personal, "textarea", &[("id", "notes")]);

        let funding = dom.element(form, "div", &[("class", "form-section")]);
        let financing = ["self", "bursary", "sponsor"]
            .iter()
            .map(|value| {
                let label = dom.element(funding, "label", &[]);
                dom.element(
                    label,
                    "input",
                    &[("type", "checkbox"), ("name", "financing"), ("value", *value)],
                )
            })
            .collect();

        let declaration = Self::consent(&dom, funding, "declaration");
        let privacy = Self::consent(&dom, funding, "privacy");
        let submit = dom.element(form, "button", &[("type", "submit")]);

        Page {
            dom,
            toggle,
            bars,
            menu,
            menu_item,
            programs_link,
            external_link,
            programs,
            cards,
            form,
            first_name,
            email,
            phone,
            id_number,
            program,
            notes,
            financing,
            declaration,
            privacy,
            submit,
        }
    }

    fn group(dom: &MemoryDom, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let group = dom.element(parent, "div", &[("class", "form-group")]);
        dom.element(group, tag, attrs)
    }

    fn consent(dom: &MemoryDom, parent: NodeId, id: &str) -> NodeId {
        let wrapper = dom.element(parent, "div", &[("class", "consent")]);
        let label = dom.element(wrapper, "label", &[]);
        dom.element(label, "input", &[("type", "checkbox"), ("id", id)])
    }

    /// Fill every field with acceptable values and tick the required boxes
    pub fn fill_valid(&self) {
        self.dom.set_value(self.first_name, "Thandi");
        self.dom.set_value(self.email, "thandi@example.co.za");
        self.dom.set_value(self.phone, "+27 82 123 4567");
        self.dom.set_value(self.id_number, "8001015009087");
        self.dom.set_value(self.program, "diploma");
        self.dom.set_checked(self.financing[1], true);
        self.dom.set_checked(self.declaration, true);
        self.dom.set_checked(self.privacy, true);
    }

    pub fn is_marked(&self, node: NodeId) -> bool {
        self.dom.has_class(&node, "error-highlight")
    }

    /// Text of the inline error message shown next to `node`, if any
    pub fn message_for(&self, node: NodeId) -> Option<String> {
        let parent = self.dom.parent(&node)?;
        self.dom
            .query_first(Some(&parent), ".error-message")
            .ok()
            .flatten()
            .map(|m| self.dom.text(m))
    }

    pub fn label_of(&self, checkbox: NodeId) -> NodeId {
        self.dom.parent(&checkbox).expect("checkbox has a label")
    }
}

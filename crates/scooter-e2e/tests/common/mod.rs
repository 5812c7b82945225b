// Shared test helpers
//
// FakeDriver is an in-memory stand-in for a browser: a flat list of nodes,
// each matched by exactly one Selector, with click/type handlers that script
// how the page reacts. scooter_site() wires it up like the real site: cookie
// notice, two-step order form, status lookup and the FAQ accordion.

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

use parking_lot::Mutex;
use scooter_e2e::driver::{Driver, ElementRef, Key, WindowHandle};
use scooter_e2e::pages::landing::locators as landing;
use scooter_e2e::pages::order_form::locators as form;
use scooter_e2e::pages::order_status::locators as status;
use scooter_e2e::{Error, Result, Selector, SuiteConfig};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::Once;

static TRACING: Once = Once::new();

/// Installs a fmt subscriber honouring RUST_LOG, once per test binary.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("scooter_e2e=debug")),
            )
            .with_test_writer()
            .try_init();
    });
}

pub const BASE_URL: &str = "https://qa-scooter.praktikum-services.ru/";
pub const TRACK_URL: &str = "https://qa-scooter.praktikum-services.ru/track";
pub const MAIN_WINDOW: &str = "main";
pub const YANDEX_WINDOW: &str = "yandex";

/// Stations the fake metro type-ahead suggests, whatever was typed.
pub const METRO_STATIONS: [&str; 4] = [
    "Бульвар Рокоссовского",
    "Черкизовская",
    "Театральная",
    "Охотный Ряд",
];

pub const FAQ_ANSWERS: [&str; 8] = [
    "Сутки — 400 рублей. Оплата курьеру — наличными или картой.",
    "Пока что у нас так: один заказ — один самокат. Если хотите покататься с друзьями, можете просто сделать несколько заказов — один за другим.",
    "Допустим, вы оформляете заказ на 8 мая. Мы привозим самокат 8 мая в течение дня. Отсчёт времени аренды начинается с момента, когда вы оплатите заказ курьеру. Если мы привезли самокат 8 мая в 20:30, суточная аренда закончится 9 мая в 20:30.",
    "Только начиная с завтрашнего дня. Но скоро станем расторопнее.",
    "Пока что нет! Но если что-то срочное — всегда можно позвонить в поддержку по красивому номеру 1010.",
    "Самокат приезжает к вам с полной зарядкой. Этого хватает на восемь суток — даже если будете кататься без передышек и во сне. Зарядка не понадобится.",
    "Да, пока самокат не привезли. Штрафа не будет, объяснительной записки тоже не попросим. Все же свои.",
    "Да, обязательно. Всем самокатов! И Москве, и Московской области.",
];

pub const PERIOD_LABELS: [&str; 7] = [
    "сутки",
    "двое суток",
    "трое суток",
    "четверо суток",
    "пятеро суток",
    "шестеро суток",
    "семеро суток",
];

/// Config pointing at the fake site, with the default 15 s horizon.
pub fn test_config() -> SuiteConfig {
    SuiteConfig::builder()
        .base_url(BASE_URL)
        .build()
        .expect("test config is valid")
}

// ============================================================================
// Fake DOM
// ============================================================================

pub type Handler = Arc<dyn Fn(&mut Dom, usize) + Send + Sync>;

#[derive(Debug, Clone)]
pub struct Node {
    pub id: u64,
    pub selector: Selector,
    pub attached: bool,
    pub displayed: bool,
    pub enabled: bool,
    pub text: String,
    pub value: String,
    /// Upcoming clicks that fail because the node is re-rendered first
    pub stale_clicks: usize,
}

#[derive(Default)]
pub struct Dom {
    pub nodes: Vec<Node>,
    pub url: String,
    pub windows: Vec<WindowHandle>,
    pub current: Option<WindowHandle>,
    pub calls: Vec<String>,
    pub quit_count: usize,
    /// Selectors whose lookup fails with a driver error
    pub broken: HashSet<Selector>,
    /// Whether confirming an order shows the success dialog
    pub confirm_succeeds: bool,
    /// Whether the scooter logo navigates back to the landing page
    pub logo_navigates: bool,
    pub known_orders: HashSet<String>,
    on_click: Vec<(Selector, Handler)>,
    on_type: Vec<(Selector, Handler)>,
    on_goto: Option<Arc<dyn Fn(&mut Dom) + Send + Sync>>,
    next_id: u64,
}

impl Dom {
    /// Adds a detached, hidden node.
    pub fn add(&mut self, selector: Selector, text: &str) -> u64 {
        self.next_id += 1;
        self.nodes.push(Node {
            id: self.next_id,
            selector,
            attached: false,
            displayed: false,
            enabled: true,
            text: text.to_string(),
            value: String::new(),
            stale_clicks: 0,
        });
        self.next_id
    }

    /// Adds an attached, visible node.
    pub fn add_shown(&mut self, selector: Selector, text: &str) -> u64 {
        let id = self.add(selector, text);
        self.show(id);
        id
    }

    pub fn node(&mut self, id: u64) -> &mut Node {
        self.nodes
            .iter_mut()
            .find(|n| n.id == id)
            .expect("node exists")
    }

    pub fn show(&mut self, id: u64) {
        let node = self.node(id);
        node.attached = true;
        node.displayed = true;
    }

    /// Attaches and displays every node matching `selector`.
    pub fn show_all(&mut self, selector: &Selector) {
        for node in self.nodes.iter_mut().filter(|n| n.selector == *selector) {
            node.attached = true;
            node.displayed = true;
        }
    }

    /// Detaches every node matching `selector`.
    pub fn remove_all(&mut self, selector: &Selector) {
        for node in self.nodes.iter_mut().filter(|n| n.selector == *selector) {
            node.attached = false;
            node.displayed = false;
        }
    }

    /// Attached nodes matching `selector`, in document order.
    pub fn matching(&mut self, selector: &Selector) -> Vec<&mut Node> {
        self.nodes
            .iter_mut()
            .filter(|n| n.attached && n.selector == *selector)
            .collect()
    }

    pub fn count(&self, selector: &Selector) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.attached && n.selector == *selector)
            .count()
    }

    /// The `index`-th attached node matching `selector`.
    pub fn nth(&mut self, selector: &Selector, index: usize) -> &mut Node {
        self.nodes
            .iter_mut()
            .filter(|n| n.attached && n.selector == *selector)
            .nth(index)
            .expect("node is attached")
    }

    /// Value of the first attached node matching `selector`.
    pub fn value_of(&self, selector: &Selector) -> Option<String> {
        self.nodes
            .iter()
            .find(|n| n.attached && n.selector == *selector)
            .map(|n| n.value.clone())
    }

    /// Value last written to a node matching `selector`, attached or not.
    pub fn stored_value(&self, selector: &Selector) -> String {
        self.nodes
            .iter()
            .find(|n| n.selector == *selector)
            .map(|n| n.value.clone())
            .unwrap_or_default()
    }

    pub fn on_click(&mut self, selector: Selector, handler: impl Fn(&mut Dom, usize) + Send + Sync + 'static) {
        self.on_click.push((selector, Arc::new(handler)));
    }

    pub fn on_type(&mut self, selector: Selector, handler: impl Fn(&mut Dom, usize) + Send + Sync + 'static) {
        self.on_type.push((selector, Arc::new(handler)));
    }

    pub fn on_goto(&mut self, handler: impl Fn(&mut Dom) + Send + Sync + 'static) {
        self.on_goto = Some(Arc::new(handler));
    }

    /// Re-renders the node: same place in the document, new identity.
    pub fn rerender(&mut self, id: u64) -> u64 {
        self.next_id += 1;
        let new_id = self.next_id;
        self.node(id).id = new_id;
        new_id
    }

    fn position(&self, element: &ElementRef) -> Result<usize> {
        let found = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.attached && n.selector == *element.selector())
            .nth(element.index());
        match found {
            Some((pos, node)) if node.id == element.token() => Ok(pos),
            _ => Err(Error::StaleReference(element.to_string())),
        }
    }

    fn handlers(list: &[(Selector, Handler)], selector: &Selector) -> Vec<Handler> {
        list.iter()
            .filter(|(s, _)| s == selector)
            .map(|(_, h)| h.clone())
            .collect()
    }
}

/// Scripted in-memory browser
pub struct FakeDriver {
    dom: Mutex<Dom>,
}

impl FakeDriver {
    pub fn new(dom: Dom) -> Arc<Self> {
        Arc::new(Self {
            dom: Mutex::new(dom),
        })
    }

    pub fn with_dom<T>(&self, f: impl FnOnce(&mut Dom) -> T) -> T {
        f(&mut self.dom.lock())
    }

    /// Every driver call so far, lookups included, as "<method> <target>".
    pub fn calls(&self) -> Vec<String> {
        self.dom.lock().calls.clone()
    }

    /// Driver calls that change the page, without lookups and probes.
    pub fn actions(&self) -> Vec<String> {
        const LOOKUPS: [&str; 7] = [
            "find_all",
            "is_displayed",
            "is_enabled",
            "text",
            "current_url",
            "window_handles",
            "current_window",
        ];
        self.calls()
            .into_iter()
            .filter(|call| {
                let method = call.split(' ').next().unwrap_or_default();
                !LOOKUPS.contains(&method)
            })
            .collect()
    }

    pub fn clicks_on(&self, selector: &Selector) -> usize {
        let prefix = format!("click {} #", selector);
        self.calls().iter().filter(|c| c.starts_with(&prefix)).count()
    }

    pub fn quit_count(&self) -> usize {
        self.dom.lock().quit_count
    }

    fn record(&self, call: String) {
        self.dom.lock().calls.push(call);
    }

    fn element_op<T>(&self, call: &str, element: &ElementRef, f: impl FnOnce(&mut Node) -> Result<T>) -> Result<T> {
        let mut dom = self.dom.lock();
        dom.calls.push(format!("{} {}", call, element));
        let pos = dom.position(element)?;
        f(&mut dom.nodes[pos])
    }
}

#[async_trait::async_trait]
impl Driver for FakeDriver {
    async fn goto(&self, url: &str) -> Result<()> {
        let mut dom = self.dom.lock();
        dom.calls.push(format!("goto {}", url));
        dom.url = url.to_string();
        if let Some(handler) = dom.on_goto.clone() {
            handler(&mut *dom);
        }
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        let mut dom = self.dom.lock();
        dom.calls.push("current_url".to_string());
        Ok(dom.url.clone())
    }

    async fn find_all(&self, selector: &Selector) -> Result<Vec<ElementRef>> {
        let mut dom = self.dom.lock();
        dom.calls.push(format!("find_all {}", selector));
        if dom.broken.contains(selector) {
            return Err(Error::Driver(format!("lookup of {} failed", selector)));
        }
        Ok(dom
            .nodes
            .iter()
            .filter(|n| n.attached && n.selector == *selector)
            .enumerate()
            .map(|(index, n)| ElementRef::new(selector.clone(), index, n.id))
            .collect())
    }

    async fn is_displayed(&self, element: &ElementRef) -> Result<bool> {
        self.element_op("is_displayed", element, |node| Ok(node.displayed))
    }

    async fn is_enabled(&self, element: &ElementRef) -> Result<bool> {
        self.element_op("is_enabled", element, |node| Ok(node.enabled))
    }

    async fn click(&self, element: &ElementRef) -> Result<()> {
        let mut dom = self.dom.lock();
        dom.calls.push(format!("click {}", element));
        let pos = dom.position(element)?;

        if dom.nodes[pos].stale_clicks > 0 {
            dom.nodes[pos].stale_clicks -= 1;
            let id = dom.nodes[pos].id;
            dom.rerender(id);
            return Err(Error::StaleReference(format!("{} re-rendered", element)));
        }
        if !dom.nodes[pos].displayed || !dom.nodes[pos].enabled {
            return Err(Error::Driver(format!("{} is not interactable", element)));
        }

        for handler in Dom::handlers(&dom.on_click, element.selector()) {
            handler(&mut *dom, element.index());
        }
        Ok(())
    }

    async fn clear(&self, element: &ElementRef) -> Result<()> {
        self.element_op("clear", element, |node| {
            node.value.clear();
            Ok(())
        })
    }

    async fn type_text(&self, element: &ElementRef, text: &str) -> Result<()> {
        self.element_op("type", element, |node| {
            node.value.push_str(text);
            Ok(())
        })?;
        let mut dom = self.dom.lock();
        for handler in Dom::handlers(&dom.on_type, element.selector()) {
            handler(&mut *dom, element.index());
        }
        Ok(())
    }

    async fn press_key(&self, element: &ElementRef, key: Key) -> Result<()> {
        self.element_op(&format!("press {}", key.name()), element, |_| Ok(()))
    }

    async fn text(&self, element: &ElementRef) -> Result<String> {
        self.element_op("text", element, |node| Ok(node.text.clone()))
    }

    async fn set_value(&self, element: &ElementRef, value: &str) -> Result<()> {
        self.element_op("set_value", element, |node| {
            node.value = value.to_string();
            Ok(())
        })
    }

    async fn scroll_into_view(&self, element: &ElementRef) -> Result<()> {
        self.element_op("scroll", element, |_| Ok(()))
    }

    async fn window_handles(&self) -> Result<Vec<WindowHandle>> {
        let mut dom = self.dom.lock();
        dom.calls.push("window_handles".to_string());
        Ok(dom.windows.clone())
    }

    async fn current_window(&self) -> Result<WindowHandle> {
        let mut dom = self.dom.lock();
        dom.calls.push("current_window".to_string());
        dom.current
            .clone()
            .ok_or_else(|| Error::InvalidState("no current window".to_string()))
    }

    async fn switch_to_window(&self, handle: &WindowHandle) -> Result<()> {
        let mut dom = self.dom.lock();
        dom.calls.push(format!("switch {}", handle));
        if !dom.windows.contains(handle) {
            return Err(Error::InvalidState(format!("no open window {}", handle)));
        }
        dom.current = Some(handle.clone());
        Ok(())
    }

    async fn close_window(&self) -> Result<()> {
        let mut dom = self.dom.lock();
        let current = dom
            .current
            .take()
            .ok_or_else(|| Error::InvalidState("no current window".to_string()))?;
        dom.calls.push(format!("close {}", current));
        dom.windows.retain(|w| *w != current);
        Ok(())
    }

    async fn quit(&self) -> Result<()> {
        self.record("quit".to_string());
        self.dom.lock().quit_count += 1;
        Ok(())
    }
}

// ============================================================================
// The scooter site
// ============================================================================

fn contact_fields() -> [Selector; 6] {
    [
        form::NAME,
        form::SURNAME,
        form::ADDRESS,
        form::METRO,
        form::PHONE,
        form::NEXT,
    ]
}

fn rental_fields() -> [Selector; 7] {
    [
        form::RENTAL_HEADER,
        form::DATE,
        form::PERIOD_DROPDOWN,
        form::COLOR_BLACK,
        form::COLOR_GREY,
        form::COMMENT,
        form::SUBMIT,
    ]
}

/// Detaches everything that is not part of the landing page itself.
fn reset_to_landing(dom: &mut Dom) {
    let transient = contact_fields()
        .into_iter()
        .chain(rental_fields())
        .chain([
            form::METRO_LIST,
            form::METRO_OPTIONS,
            form::PERIOD_OPTIONS,
            form::CONFIRM,
            form::SUCCESS_HEADER,
            form::VALIDATION_ERRORS,
            status::ORDER_ID,
            status::GO,
            status::NOT_FOUND,
        ]);
    for selector in transient {
        dom.remove_all(&selector);
    }
    for index in 0..FAQ_ANSWERS.len() {
        for node in dom.matching(&landing::faq_panel(index)) {
            node.displayed = false;
        }
    }
}

/// Fake of the scooter site, opened on a fresh landing page.
pub fn scooter_site() -> Dom {
    let mut dom = Dom {
        url: "about:blank".to_string(),
        windows: vec![WindowHandle::new(MAIN_WINDOW)],
        current: Some(WindowHandle::new(MAIN_WINDOW)),
        confirm_succeeds: true,
        logo_navigates: true,
        ..Dom::default()
    };

    // Header and landing page
    dom.add_shown(landing::COOKIE_BANNER, "И здесь куки! А вы думали?");
    dom.add_shown(landing::COOKIE_ACCEPT, "да все привыкли");
    dom.add_shown(landing::ORDER_TOP, "Заказать");
    dom.add_shown(landing::ORDER_BOTTOM, "Заказать");
    dom.add_shown(landing::ORDER_STATUS, "Статус заказа");
    dom.add_shown(landing::YANDEX_LOGO, "");
    dom.add_shown(status::SCOOTER_LOGO, "");
    for (index, answer) in FAQ_ANSWERS.iter().enumerate() {
        dom.add_shown(landing::FAQ_HEADINGS, &format!("Вопрос {}", index));
        let panel = dom.add(landing::faq_panel(index), &format!("\n  {}  \n", answer));
        dom.node(panel).attached = true;
    }

    dom.on_click(landing::COOKIE_ACCEPT, |dom, _| {
        dom.remove_all(&landing::COOKIE_BANNER);
        dom.remove_all(&landing::COOKIE_ACCEPT);
    });
    dom.on_click(landing::FAQ_HEADINGS, |dom, index| {
        for i in 0..FAQ_ANSWERS.len() {
            for node in dom.matching(&landing::faq_panel(i)) {
                node.displayed = i == index;
            }
        }
    });
    dom.on_click(landing::YANDEX_LOGO, |dom, _| {
        dom.windows.insert(0, WindowHandle::new(YANDEX_WINDOW));
    });
    dom.on_goto(reset_to_landing);

    // Order form, step one
    for selector in contact_fields() {
        let text = if selector == form::NEXT { "Далее" } else { "" };
        dom.add(selector, text);
    }
    dom.add(form::METRO_LIST, "");
    for station in METRO_STATIONS {
        dom.add(form::METRO_OPTIONS, station);
    }
    for _ in 0..5 {
        dom.add(form::VALIDATION_ERRORS, "Введите корректное значение");
    }

    let start_order = |dom: &mut Dom, _: usize| {
        reset_to_landing(dom);
        for selector in contact_fields() {
            dom.show_all(&selector);
        }
    };
    dom.on_click(landing::ORDER_TOP, start_order);
    dom.on_click(landing::ORDER_BOTTOM, start_order);

    dom.on_type(form::METRO, |dom, _| {
        dom.show_all(&form::METRO_LIST);
        dom.show_all(&form::METRO_OPTIONS);
    });
    dom.on_click(form::METRO_OPTIONS, |dom, index| {
        let station = dom.nth(&form::METRO_OPTIONS, index).text.clone();
        dom.nth(&form::METRO, 0).value = station;
        dom.remove_all(&form::METRO_LIST);
        dom.remove_all(&form::METRO_OPTIONS);
    });

    dom.on_click(form::NEXT, |dom, _| {
        let missing = [form::NAME, form::SURNAME, form::ADDRESS, form::METRO, form::PHONE]
            .iter()
            .filter(|s| dom.value_of(s).unwrap_or_default().is_empty())
            .count();
        if missing > 0 {
            for node in dom
                .nodes
                .iter_mut()
                .filter(|n| n.selector == form::VALIDATION_ERRORS)
                .take(missing)
            {
                node.attached = true;
                node.displayed = true;
            }
            return;
        }
        for selector in contact_fields() {
            dom.remove_all(&selector);
        }
        for selector in rental_fields() {
            dom.show_all(&selector);
        }
    });

    // Order form, step two
    for selector in rental_fields() {
        let text = if selector == form::RENTAL_HEADER {
            "Про аренду"
        } else if selector == form::SUBMIT {
            "Заказать"
        } else {
            ""
        };
        dom.add(selector, text);
    }
    for label in PERIOD_LABELS {
        dom.add(form::PERIOD_OPTIONS, label);
    }
    dom.add(form::CONFIRM, "Да");
    dom.add(form::SUCCESS_HEADER, "Заказ оформлен");

    dom.on_click(form::PERIOD_DROPDOWN, |dom, _| {
        dom.show_all(&form::PERIOD_OPTIONS);
    });
    dom.on_click(form::PERIOD_OPTIONS, |dom, index| {
        let label = dom.nth(&form::PERIOD_OPTIONS, index).text.clone();
        dom.nth(&form::PERIOD_DROPDOWN, 0).value = label;
        dom.remove_all(&form::PERIOD_OPTIONS);
    });
    dom.on_click(form::COLOR_BLACK, |dom, _| {
        dom.nth(&form::COLOR_BLACK, 0).value = "checked".to_string();
    });
    dom.on_click(form::COLOR_GREY, |dom, _| {
        dom.nth(&form::COLOR_GREY, 0).value = "checked".to_string();
    });
    dom.on_click(form::SUBMIT, |dom, _| {
        dom.show_all(&form::CONFIRM);
    });
    dom.on_click(form::CONFIRM, |dom, _| {
        dom.remove_all(&form::CONFIRM);
        if dom.confirm_succeeds {
            dom.show_all(&form::SUCCESS_HEADER);
        }
    });

    // Order status lookup
    dom.add(status::ORDER_ID, "");
    dom.add(status::GO, "Go!");
    dom.add(status::NOT_FOUND, "");

    dom.on_click(landing::ORDER_STATUS, |dom, _| {
        dom.show_all(&status::ORDER_ID);
        dom.show_all(&status::GO);
    });
    dom.on_click(status::GO, |dom, _| {
        let id = dom.value_of(&status::ORDER_ID).unwrap_or_default();
        dom.url = TRACK_URL.to_string();
        if !dom.known_orders.contains(&id) {
            dom.show_all(&status::NOT_FOUND);
        }
    });
    dom.on_click(status::SCOOTER_LOGO, |dom, _| {
        if dom.logo_navigates {
            dom.url = BASE_URL.to_string();
            reset_to_landing(dom);
        }
    });

    dom
}

/// Fake driver serving scooter_site(), plus the same driver as a trait object.
pub fn fake_site() -> (Arc<FakeDriver>, Arc<dyn Driver>) {
    let fake = FakeDriver::new(scooter_site());
    let driver: Arc<dyn Driver> = fake.clone();
    (fake, driver)
}

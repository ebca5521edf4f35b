//! Typed element bindings, navigation model and loading guards.
//!
//! [`View`] is resolved once from a [`Document`] at startup. Each handle is
//! `Some(id)` only when the element exists, so a page variant that lacks an
//! element simply turns every write to it into a no-op.

use std::fmt;
use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::dom::{Content, Document, Element, ElementId};

// ---------------------------------------------------------------------------
// Bindings
// ---------------------------------------------------------------------------

macro_rules! view_bindings {
    ($($field:ident => $id:literal),* $(,)?) => {
        /// Handles to every element the controller and renderers touch.
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct View {
            $(pub $field: Option<ElementId>,)*
        }

        impl View {
            /// Resolve every handle against `doc`.
            pub fn bind(doc: &Document) -> Self {
                Self {
                    $($field: doc.contains($id).then_some($id),)*
                }
            }
        }

        /// Every element id the page defines.
        pub const ELEMENT_IDS: &[ElementId] = &[$($id),*];
    };
}

view_bindings! {
    // pages
    welcome_screen => "welcome_screen",
    guide_view => "guide_view",
    about_view => "about_view",
    umkm_page => "umkm_page",
    creator_page => "creator_page",
    brand_page => "brand_page",

    // persona tab buttons
    umkm_tab_single => "umkm_tab_single",
    umkm_tab_batch => "umkm_tab_batch",
    umkm_tab_dashboard => "umkm_tab_dashboard",
    creator_tab_youtube => "creator_tab_youtube",
    creator_tab_dashboard => "creator_tab_dashboard",
    brand_tab_youtube => "brand_tab_youtube",
    brand_tab_battle => "brand_tab_battle",
    brand_tab_dashboard => "brand_tab_dashboard",

    // tab views
    analyze_view => "analyze_view",
    batch_view => "batch_view",
    social_view => "social_view",
    dashboard_view => "dashboard_view",
    battle_view => "battle_view",

    // auth
    auth_buttons => "auth_buttons",
    login_modal => "loginModal",
    login_username => "loginUsername",
    login_password => "loginPassword",
    login_error => "loginError",
    confirm_login_btn => "confirmLoginBtn",

    // single analysis
    input_text => "inputText",
    char_count => "charCount",
    analyze_btn => "analyzeBtn",
    clear_btn => "clearBtn",
    result_card => "resultCard",
    sentiment_label => "sentimentLabel",
    sentiment_icon => "sentimentIcon",
    sentiment_desc => "sentimentDesc",
    confidence_score => "confidenceScore",
    aspect_section => "aspectSection",
    aspect_list => "aspectList",

    // history + stats
    history_list => "historyList",
    clear_history_btn => "clearHistoryBtn",
    total_count => "totalCount",
    bar_pos => "barPos",
    bar_neg => "barNeg",
    bar_neu => "barNeu",
    count_pos => "countPos",
    count_neg => "countNeg",
    count_neu => "countNeu",

    // feedback
    feedback_modal => "feedbackModal",
    feedback_analysis_id => "feedbackAnalysisId",

    // batch
    batch_file => "batchFile",
    drop_zone => "dropZone",
    file_info => "fileInfo",
    file_name => "fileName",
    remove_file_btn => "removeFileBtn",
    analyze_batch_btn => "analyzeBatchBtn",
    batch_result => "batchResult",
    batch_pos => "batchPos",
    batch_neg => "batchNeg",
    batch_neu => "batchNeu",
    batch_products => "batchProducts",
    batch_insights => "batchInsights",
    batch_table_head => "batchTableHead",
    batch_table_body => "batchTableBody",
    download_csv_btn => "downloadCsvBtn",

    // social
    social_url => "socialUrl",
    analyze_social_btn => "analyzeSocialBtn",
    social_result => "socialResult",
    social_pos => "socialPos",
    social_neg => "socialNeg",
    social_neu => "socialNeu",
    social_comments_list => "socialCommentsList",
    save_analysis_label => "saveAnalysisLabel",
    save_youtube_btn => "saveYoutubeBtn",

    // dashboard
    dashboard_login_msg => "dashboard_login_msg",
    dashboard_content => "dashboard_content",
    total_analyses => "total_analyses",
    positive_count => "positive_count",
    negative_count => "negative_count",
    trend_chart => "trendChart",
    word_cloud_canvas => "wordCloudCanvas",
    wordcloud_loading => "wordcloud_loading",

    // battle
    battle_url_a => "battleUrlA",
    battle_url_b => "battleUrlB",
    start_battle_btn => "startBattleBtn",
    battle_result => "battleResult",
    score_a => "scoreA",
    pos_a => "posA",
    neg_a => "negA",
    score_b => "scoreB",
    pos_b => "posB",
    neg_b => "negB",
    battle_verdict => "battleVerdict",
}

/// Elements that start out hidden.
const INITIALLY_HIDDEN: &[ElementId] = &[
    "guide_view",
    "about_view",
    "umkm_page",
    "creator_page",
    "brand_page",
    "analyze_view",
    "batch_view",
    "social_view",
    "dashboard_view",
    "battle_view",
    "loginModal",
    "loginError",
    "clearBtn",
    "resultCard",
    "aspectSection",
    "clearHistoryBtn",
    "feedbackModal",
    "fileInfo",
    "batchResult",
    "batchProducts",
    "batchInsights",
    "socialResult",
    "dashboard_login_msg",
    "dashboard_content",
    "wordcloud_loading",
    "battleResult",
];

/// Class shared by every tab button.
pub const TAB_BUTTON_CLASS: &str = "tab-btn";

/// Class of the highlighted tab button.
pub const ACTIVE_CLASS: &str = "active";

impl Document {
    /// The full page in its initial state: home visible, everything else
    /// hidden, batch submit disabled until a file is chosen.
    pub fn skeleton() -> Self {
        let mut doc = Document::new();
        for id in ELEMENT_IDS {
            doc.insert(id, Element::new());
        }
        for id in INITIALLY_HIDDEN {
            doc.insert(id, Element::hidden());
        }
        for persona in Persona::ALL {
            for tab in persona.tabs() {
                if let Some(id) = persona.tab_button_id(*tab) {
                    doc.insert(id, Element::new().with_class(TAB_BUTTON_CLASS));
                }
            }
        }
        doc.insert("analyzeBatchBtn", Element::new().disabled());
        doc.insert("charCount", Element::new().with_text("0 / 500 karakter"));
        doc
    }
}

// ---------------------------------------------------------------------------
// Navigation model
// ---------------------------------------------------------------------------

/// Audience-specific landing page grouping a subset of tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    Umkm,
    Creator,
    Brand,
}

impl Persona {
    pub const ALL: [Persona; 3] = [Persona::Umkm, Persona::Creator, Persona::Brand];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Umkm => "umkm",
            Self::Creator => "creator",
            Self::Brand => "brand",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == raw)
    }

    /// Tabs offered on this persona's page, in display order.
    pub fn tabs(self) -> &'static [Tab] {
        match self {
            Self::Umkm => &[Tab::Analyze, Tab::Batch, Tab::Dashboard],
            Self::Creator => &[Tab::Social, Tab::Dashboard],
            Self::Brand => &[Tab::Social, Tab::Battle, Tab::Dashboard],
        }
    }

    pub fn default_tab(self) -> Tab {
        match self {
            Self::Umkm => Tab::Analyze,
            Self::Creator | Self::Brand => Tab::Social,
        }
    }

    pub fn offers(self, tab: Tab) -> bool {
        self.tabs().contains(&tab)
    }

    fn page_id(self) -> ElementId {
        match self {
            Self::Umkm => "umkm_page",
            Self::Creator => "creator_page",
            Self::Brand => "brand_page",
        }
    }

    fn tab_button_id(self, tab: Tab) -> Option<ElementId> {
        match (self, tab) {
            (Self::Umkm, Tab::Analyze) => Some("umkm_tab_single"),
            (Self::Umkm, Tab::Batch) => Some("umkm_tab_batch"),
            (Self::Umkm, Tab::Dashboard) => Some("umkm_tab_dashboard"),
            (Self::Creator, Tab::Social) => Some("creator_tab_youtube"),
            (Self::Creator, Tab::Dashboard) => Some("creator_tab_dashboard"),
            (Self::Brand, Tab::Social) => Some("brand_tab_youtube"),
            (Self::Brand, Tab::Battle) => Some("brand_tab_battle"),
            (Self::Brand, Tab::Dashboard) => Some("brand_tab_dashboard"),
            _ => None,
        }
    }
}

/// A feature view within a persona page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    Analyze,
    Batch,
    Social,
    Dashboard,
    Battle,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Analyze,
        Tab::Batch,
        Tab::Social,
        Tab::Dashboard,
        Tab::Battle,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Analyze => "analyze",
            Self::Batch => "batch",
            Self::Social => "social",
            Self::Dashboard => "dashboard",
            Self::Battle => "battle",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == raw)
    }

    /// The persona whose page hosts this tab when it is opened from outside
    /// any persona page.
    pub fn home_persona(self) -> Persona {
        match self {
            Self::Analyze | Self::Batch | Self::Dashboard => Persona::Umkm,
            Self::Social => Persona::Creator,
            Self::Battle => Persona::Brand,
        }
    }
}

/// Top-level page. At most one is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Page {
    Home,
    Guide,
    About,
    Persona(Persona),
}

impl Page {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "home" => Some(Self::Home),
            "guide" => Some(Self::Guide),
            "about" => Some(Self::About),
            other => Persona::parse(other).map(Self::Persona),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Guide => "guide",
            Self::About => "about",
            Self::Persona(p) => p.as_str(),
        }
    }

    pub fn persona(self) -> Option<Persona> {
        match self {
            Self::Persona(p) => Some(p),
            _ => None,
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Page {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw).ok_or_else(|| format!("unknown page: {raw}"))
    }
}

impl From<Page> for String {
    fn from(page: Page) -> Self {
        page.as_str().to_string()
    }
}

// -- Lookups from the navigation model into bound handles --

impl View {
    /// Container element of a page.
    pub fn page(&self, page: Page) -> Option<ElementId> {
        match page {
            Page::Home => self.welcome_screen,
            Page::Guide => self.guide_view,
            Page::About => self.about_view,
            Page::Persona(p) => self.bound(p.page_id()),
        }
    }

    pub fn pages(&self) -> [Option<ElementId>; 6] {
        [
            self.welcome_screen,
            self.guide_view,
            self.about_view,
            self.umkm_page,
            self.creator_page,
            self.brand_page,
        ]
    }

    pub fn tab_view(&self, tab: Tab) -> Option<ElementId> {
        match tab {
            Tab::Analyze => self.analyze_view,
            Tab::Batch => self.batch_view,
            Tab::Social => self.social_view,
            Tab::Dashboard => self.dashboard_view,
            Tab::Battle => self.battle_view,
        }
    }

    pub fn tab_views(&self) -> [Option<ElementId>; 5] {
        Tab::ALL.map(|tab| self.tab_view(tab))
    }

    /// Button that selects `tab` on `persona`'s page.
    pub fn tab_button(&self, persona: Persona, tab: Tab) -> Option<ElementId> {
        self.bound(persona.tab_button_id(tab)?)
    }

    pub fn tab_buttons(&self) -> Vec<Option<ElementId>> {
        Persona::ALL
            .iter()
            .flat_map(|p| p.tabs().iter().map(move |t| self.tab_button(*p, *t)))
            .collect()
    }

    /// Map a raw id back to its bound handle (`None` if it was not bound).
    fn bound(&self, id: ElementId) -> Option<ElementId> {
        [
            self.umkm_page,
            self.creator_page,
            self.brand_page,
            self.umkm_tab_single,
            self.umkm_tab_batch,
            self.umkm_tab_dashboard,
            self.creator_tab_youtube,
            self.creator_tab_dashboard,
            self.brand_tab_youtube,
            self.brand_tab_battle,
            self.brand_tab_dashboard,
        ]
        .into_iter()
        .flatten()
        .find(|bound| *bound == id)
    }
}

// ---------------------------------------------------------------------------
// Loading guard
// ---------------------------------------------------------------------------

/// Disables a control and shows a busy label for as long as it lives.
///
/// Dropping the guard restores the control's original content and
/// re-enables it, whichever way the scope is left. The guard dereferences to
/// the document so renderers can keep writing through it.
pub struct LoadingGuard<'a> {
    doc: &'a mut Document,
    control: Option<ElementId>,
    original: Option<Content>,
}

impl<'a> LoadingGuard<'a> {
    pub fn acquire(doc: &'a mut Document, control: Option<ElementId>, busy_label: &str) -> Self {
        let original = control.and_then(|id| doc.content(id).cloned());
        doc.set_disabled(control, true);
        doc.set_text(control, busy_label);
        Self {
            doc,
            control,
            original,
        }
    }
}

impl Deref for LoadingGuard<'_> {
    type Target = Document;

    fn deref(&self) -> &Document {
        self.doc
    }
}

impl DerefMut for LoadingGuard<'_> {
    fn deref_mut(&mut self) -> &mut Document {
        self.doc
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.doc.set_content(self.control, self.original.take());
        self.doc.set_disabled(self.control, false);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Page routes shared by the browser front and the static site server

use serde::{Deserialize, Serialize};

use crate::field::NumericField;
use crate::models::{BASE_WINE_FIELDS, BLEND_FIELDS, BOTTLING_FIELDS, PACKAGING_FIELDS, STARTER_FIELDS};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Home,
    BaseWine,
    Blend,
    Bottling,
    Starter,
    Packaging,
    Delivery,
}

impl Route {
    pub const ALL: [Route; 7] = [
        Route::Home,
        Route::BaseWine,
        Route::Blend,
        Route::Bottling,
        Route::Starter,
        Route::Packaging,
        Route::Delivery,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::BaseWine => "/basvin",
            Route::Blend => "/blend",
            Route::Bottling => "/buteljering",
            Route::Starter => "/jaststart",
            Route::Packaging => "/inrapportering/forpackningar",
            Route::Delivery => "/instruktioner/leverans",
        }
    }

    /// Page heading
    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Ästad – Kalkylatorer",
            Route::BaseWine => "Basvinkalkylator",
            Route::Blend => "Blendkalkylator",
            Route::Bottling => "Buteljering – andrajäsning",
            Route::Starter => "Jäststart till andrajäsning",
            Route::Packaging => "Inrapportering – Förpackningar",
            Route::Delivery => "Leverans – Checklista",
        }
    }

    /// Numeric inputs of the page, empty for pages without a form
    pub fn fields(&self) -> &'static [NumericField] {
        match self {
            Route::BaseWine => BASE_WINE_FIELDS,
            Route::Blend => BLEND_FIELDS,
            Route::Bottling => BOTTLING_FIELDS,
            Route::Starter => STARTER_FIELDS,
            Route::Packaging => PACKAGING_FIELDS,
            Route::Home | Route::Delivery => &[],
        }
    }

    /// Resolve a location path or hash
    ///
    /// Accepts `/basvin`, `/basvin/`, `#/basvin` and `#basvin`. Query strings
    /// are ignored. Unknown paths resolve to `None`.
    pub fn from_path(location: &str) -> Option<Route> {
        let path = location.trim().trim_start_matches('#');
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = path.trim_matches('/');

        Route::ALL
            .iter()
            .copied()
            .find(|route| route.path().trim_start_matches('/') == path)
    }
}

/// One card on the home page
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToolCard {
    pub route: Route,
    pub path: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
}

impl ToolCard {
    fn new(route: Route, title: &'static str, subtitle: &'static str) -> Self {
        Self {
            route,
            path: route.path(),
            title,
            subtitle,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToolCategory {
    pub title: &'static str,
    pub tools: Vec<ToolCard>,
}

/// Home page index, grouped by category
pub fn tool_index() -> Vec<ToolCategory> {
    vec![
        ToolCategory {
            title: "Andrajäsning",
            tools: vec![
                ToolCard::new(Route::Blend, "Blendkalkylator", "Lot-baserad blend, analyser och recept."),
                ToolCard::new(
                    Route::BaseWine,
                    "Basvinkalkylator",
                    "Dosering av socker och must, målalkohol och volym.",
                ),
                ToolCard::new(
                    Route::Starter,
                    "Jäststart till andrajäsning",
                    "Interaktiv manual och uträkningar.",
                ),
                ToolCard::new(
                    Route::Bottling,
                    "Buteljering – andrajäsning",
                    "Jäst, näring och adjuvant per buteljering.",
                ),
            ],
        },
        ToolCategory {
            title: "Instruktioner",
            tools: vec![ToolCard::new(
                Route::Delivery,
                "Leverans – Checklista",
                "Bocka av steg, öppna länkar till Monday/Innovint/Sheets.",
            )],
        },
        ToolCategory {
            title: "Inrapportering",
            tools: vec![ToolCard::new(
                Route::Packaging,
                "Förpackningar",
                "Vikt per materialström (kg) för rapport till TMR.",
            )],
        },
    ]
}

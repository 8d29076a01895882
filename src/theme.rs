// Theme - table-driven dark/light style switch
//
// Each theme is a table of named sections. Widgets ask for the section they
// render and get an explicit palette back; nothing reads theme state ambiently.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xff, 0xff, 0xff);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKind {
    Light,
    #[default]
    Dark,
}

impl ThemeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeKind::Light => "light",
            ThemeKind::Dark => "dark",
        }
    }

    pub fn from_name(name: &str) -> Option<ThemeKind> {
        match name.trim().to_ascii_lowercase().as_str() {
            "light" => Some(ThemeKind::Light),
            "dark" => Some(ThemeKind::Dark),
            _ => None,
        }
    }

    pub fn other(&self) -> ThemeKind {
        match self {
            ThemeKind::Light => ThemeKind::Dark,
            ThemeKind::Dark => ThemeKind::Light,
        }
    }
}

/// Named style sections of a theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    MainWindow,
    Navigation,
    Content,
    Cards,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub background: Rgb,
    pub foreground: Rgb,
    pub border: Rgb,
    pub accent: Rgb,
    pub hover: Rgb,
    pub alternate_row: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeStyles {
    pub main_window: Palette,
    pub navigation: Palette,
    pub content: Palette,
    pub cards: Palette,
}

impl ThemeStyles {
    pub fn section(&self, section: Section) -> Palette {
        match section {
            Section::MainWindow => self.main_window,
            Section::Navigation => self.navigation,
            Section::Content => self.content,
            Section::Cards => self.cards,
        }
    }
}

const ACCENT: Rgb = Rgb(0x00, 0x7b, 0xff);

const DARK: ThemeStyles = ThemeStyles {
    main_window: Palette {
        background: Rgb(0x1a, 0x1a, 0x1a),
        foreground: Rgb::WHITE,
        border: Rgb(0x40, 0x40, 0x40),
        accent: ACCENT,
        hover: Rgb(0x40, 0x40, 0x40),
        alternate_row: Rgb(0x2d, 0x2d, 0x2d),
    },
    navigation: Palette {
        background: Rgb(0x2d, 0x2d, 0x2d),
        foreground: Rgb::WHITE,
        border: Rgb(0x40, 0x40, 0x40),
        accent: ACCENT,
        hover: Rgb(0x40, 0x40, 0x40),
        alternate_row: Rgb(0x4a, 0x4a, 0x4a),
    },
    content: Palette {
        background: Rgb(0x1a, 0x1a, 0x1a),
        foreground: Rgb::WHITE,
        border: Rgb(0x40, 0x40, 0x40),
        accent: ACCENT,
        hover: Rgb(0x00, 0x56, 0xb3),
        alternate_row: Rgb(0x40, 0x40, 0x40),
    },
    cards: Palette {
        background: Rgb(0x2d, 0x2d, 0x2d),
        foreground: Rgb::WHITE,
        border: Rgb(0x40, 0x40, 0x40),
        accent: ACCENT,
        hover: Rgb(0x40, 0x40, 0x40),
        alternate_row: Rgb(0x40, 0x40, 0x40),
    },
};

const LIGHT: ThemeStyles = ThemeStyles {
    main_window: Palette {
        background: Rgb::WHITE,
        foreground: Rgb(0x33, 0x33, 0x33),
        border: Rgb(0xe9, 0xec, 0xef),
        accent: ACCENT,
        hover: Rgb(0xe9, 0xec, 0xef),
        alternate_row: Rgb(0xf8, 0xf9, 0xfa),
    },
    navigation: Palette {
        background: Rgb(0xf8, 0xf9, 0xfa),
        foreground: Rgb(0x49, 0x50, 0x57),
        border: Rgb(0xe9, 0xec, 0xef),
        accent: ACCENT,
        hover: Rgb(0xe9, 0xec, 0xef),
        alternate_row: Rgb(0xde, 0xe2, 0xe6),
    },
    content: Palette {
        background: Rgb::WHITE,
        foreground: Rgb(0x33, 0x33, 0x33),
        border: Rgb(0xce, 0xd4, 0xda),
        accent: ACCENT,
        hover: Rgb(0x00, 0x56, 0xb3),
        alternate_row: Rgb(0xf8, 0xf9, 0xfa),
    },
    cards: Palette {
        background: Rgb::WHITE,
        foreground: Rgb(0x33, 0x33, 0x33),
        border: Rgb(0xde, 0xe2, 0xe6),
        accent: ACCENT,
        hover: Rgb(0xf8, 0xf9, 0xfa),
        alternate_row: Rgb(0xf8, 0xf9, 0xfa),
    },
};

/// Style table lookup
pub fn styles_for(kind: ThemeKind) -> &'static ThemeStyles {
    match kind {
        ThemeKind::Light => &LIGHT,
        ThemeKind::Dark => &DARK,
    }
}

/// Holds the active theme; the UI owns one and passes palettes down
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeManager {
    current: ThemeKind,
}

impl ThemeManager {
    pub fn new(kind: ThemeKind) -> Self {
        ThemeManager { current: kind }
    }

    pub fn current(&self) -> ThemeKind {
        self.current
    }

    /// Switch by name. Unknown names leave the theme untouched.
    pub fn set(&mut self, name: &str) -> bool {
        match ThemeKind::from_name(name) {
            Some(kind) => {
                self.current = kind;
                log::info!("theme set to {}", kind.as_str());
                true
            }
            None => {
                log::warn!("unknown theme requested: {}", name);
                false
            }
        }
    }

    pub fn toggle(&mut self) -> ThemeKind {
        self.current = self.current.other();
        log::info!("theme toggled to {}", self.current.as_str());
        self.current
    }

    pub fn styles(&self) -> &'static ThemeStyles {
        styles_for(self.current)
    }

    /// Palette for one section of the current theme
    pub fn palette(&self, section: Section) -> Palette {
        self.styles().section(section)
    }

    /// Label for the toggle button: names the theme it switches to
    pub fn toggle_label(&self) -> &'static str {
        match self.current {
            ThemeKind::Dark => "☀ Light mode",
            ThemeKind::Light => "☾ Dark mode",
        }
    }
}

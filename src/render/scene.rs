use crate::{
    core::population::Population,
    types::{DecorativeItem, ItemId, Kind, Layer, LAYER_COUNT},
};

pub const HEADLINE: &str = "MONEY";
pub const SUBLINE: &str = "RAIN";
pub const FOOTER: &str = "money rain · q to quit";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backdrop {
    Gradient,
    Noise,
    Scanlines,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CornerDeco {
    pub corner: Corner,
    pub text: &'static str,
}

/// Concentric ring around the title. Radius is a fraction of the shorter viewport side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PulseCircle {
    pub radius: f64,
    pub period_secs: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TitleBlock {
    pub headline: &'static str,
    pub subline: &'static str,
    pub glitch: bool,
}

/// Presentation parameters for one item, consumed by the painter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ItemStyle {
    pub id: ItemId,
    pub kind: Kind,
    pub symbol: char,
    pub left_pct: f64,
    pub font_size: f64,
    pub duration_secs: f64,
    pub delay_secs: f64,
    pub rotation_deg: f64,
    pub rotation_speed_deg: f64,
}

impl From<&DecorativeItem> for ItemStyle {
    fn from(item: &DecorativeItem) -> Self {
        Self {
            id: item.id,
            kind: item.kind,
            symbol: item.symbol,
            left_pct: item.x,
            font_size: item.size,
            duration_secs: item.fall_duration,
            delay_secs: item.start_delay,
            rotation_deg: item.rotation,
            rotation_speed_deg: item.rotation_speed,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParallaxLayer {
    pub layer: Layer,
    pub items: Vec<ItemStyle>,
}

/// Everything on screen for one state of the effect. Static parts are constant.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub backdrop: [Backdrop; 3],
    pub title: TitleBlock,
    pub layers: [ParallaxLayer; LAYER_COUNT],
    pub flash_overlay: bool,
    pub corners: [CornerDeco; 4],
    pub pulses: [PulseCircle; 3],
    pub footer: &'static str,
}

pub fn compose(population: &Population, flash: bool) -> Scene {
    let layers = Layer::ALL.map(|layer| ParallaxLayer {
        layer,
        items: population.layer(layer).map(ItemStyle::from).collect(),
    });

    Scene {
        backdrop: [Backdrop::Gradient, Backdrop::Noise, Backdrop::Scanlines],
        title: TitleBlock {
            headline: HEADLINE,
            subline: SUBLINE,
            glitch: true,
        },
        layers,
        flash_overlay: flash,
        corners: [
            CornerDeco {
                corner: Corner::TopLeft,
                text: "$$$",
            },
            CornerDeco {
                corner: Corner::TopRight,
                text: "€€€",
            },
            CornerDeco {
                corner: Corner::BottomLeft,
                text: "£££",
            },
            CornerDeco {
                corner: Corner::BottomRight,
                text: "¥¥¥",
            },
        ],
        pulses: [
            PulseCircle {
                radius: 0.2,
                period_secs: 2.0,
            },
            PulseCircle {
                radius: 0.32,
                period_secs: 3.0,
            },
            PulseCircle {
                radius: 0.44,
                period_secs: 4.0,
            },
        ],
        footer: FOOTER,
    }
}

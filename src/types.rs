use std::fmt;

pub const SYMBOL_GLYPHS: [char; 5] = ['$', '€', '£', '¥', '₿'];
pub const BILL_GLYPHS: [char; 4] = ['💵', '💴', '💶', '💷'];
pub const COIN_GLYPHS: [char; 4] = ['🪙', '💰', '💎', '🏆'];

pub const LAYER_COUNT: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Symbol,
    Bill,
    Coin,
}

impl Kind {
    pub fn palette(self) -> &'static [char] {
        match self {
            Kind::Symbol => &SYMBOL_GLYPHS,
            Kind::Bill => &BILL_GLYPHS,
            Kind::Coin => &COIN_GLYPHS,
        }
    }

    /// Terminal cells one glyph of this kind occupies. Bills and coins are emoji.
    pub fn glyph_width(self) -> u16 {
        match self {
            Kind::Symbol => 1,
            Kind::Bill | Kind::Coin => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    Far,
    Mid,
    Near,
}

impl Layer {
    pub const ALL: [Layer; LAYER_COUNT] = [Layer::Far, Layer::Mid, Layer::Near];

    pub fn index(self) -> usize {
        match self {
            Layer::Far => 0,
            Layer::Mid => 1,
            Layer::Near => 2,
        }
    }
}

/// One falling glyph. Never mutated once generated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecorativeItem {
    pub id: ItemId,
    pub symbol: char,
    pub kind: Kind,
    /// Percent of viewport width, `[0, 100)`.
    pub x: f64,
    pub size: f64,
    /// Seconds per fall cycle.
    pub fall_duration: f64,
    /// Negative, so items are already mid-fall at mount.
    pub start_delay: f64,
    pub rotation: f64,
    pub rotation_speed: f64,
    pub layer: Layer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorId {
    White,
    Gold,
    Green,
    DimGreen,
    DeepGreen,
    Gray,
    Magenta,
    Cyan,
    Flash,
    /// Backdrop tint; higher is brighter.
    Shade(u8),
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SurfaceStats {
    pub population: usize,
    pub cap: usize,
    pub per_layer: [usize; LAYER_COUNT],
    pub flashes: u64,
    pub flash_active: bool,
    pub elapsed_secs: f64,
}

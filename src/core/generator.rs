use crate::{
    config::{self, Tuning},
    core::random::RandomSource,
    types::{DecorativeItem, ItemId, Kind, Layer, LAYER_COUNT},
};

/// Builds one item with freshly drawn visual parameters. Reads nothing but `source`.
pub fn generate(id: ItemId, source: &mut dyn RandomSource, tuning: &Tuning) -> DecorativeItem {
    let kind = pick_kind(source, tuning);
    let palette = kind.palette();
    let symbol = palette[source.index(palette.len())];

    let size_min = match kind {
        Kind::Symbol => config::SYMBOL_SIZE_MIN,
        Kind::Bill | Kind::Coin => config::EMOJI_SIZE_MIN,
    };

    let x = source.between(0.0, 100.0);
    let size = source.between(size_min, config::SIZE_MAX);
    let fall_duration = source.between(config::FALL_DURATION_MIN, config::FALL_DURATION_MAX);
    let start_delay = source.between(config::START_DELAY_MIN, 0.0);
    let rotation = source.between(0.0, 360.0);
    let rotation_speed = (source.unit() - 0.5) * config::SPIN_RANGE;
    let layer = Layer::ALL[source.index(LAYER_COUNT)];

    DecorativeItem {
        id,
        symbol,
        kind,
        x,
        size,
        fall_duration,
        start_delay,
        rotation,
        rotation_speed,
        layer,
    }
}

fn pick_kind(source: &mut dyn RandomSource, tuning: &Tuning) -> Kind {
    if source.unit() > tuning.symbol_threshold {
        Kind::Symbol
    } else if source.unit() > tuning.bill_split {
        Kind::Bill
    } else {
        Kind::Coin
    }
}

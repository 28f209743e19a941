//! Derivations for palette slots the image did not provide.
//!
//! A [`SlotPlan`] lists every slot a finished palette must contain, in the
//! order the generator fills them. A slot may carry a [`Derivation`] that
//! builds its color from the prominent color and the slots filled so far.
//! [`SlotPlan::standard`] is the 29 slot terminal theme.

use std::fmt;

use chroma_color::{Color, Hex};

use crate::matcher::coerce;
use crate::palette::Palette;
use crate::rules::{ConditionMap, HslCondition};

/// Builds a slot's color, or `None` if a slot it depends on is missing.
pub type Derivation = Box<dyn Fn(&DeriveContext<'_>) -> Option<Color> + Send + Sync>;

/// What a [`Derivation`] can see while the palette is being built.
#[derive(Debug, Clone, Copy)]
pub struct DeriveContext<'a> {
    prominent: &'a Hex,
    palette: &'a Palette,
    conditions: &'a ConditionMap,
}

impl<'a> DeriveContext<'a> {
    pub fn new(prominent: &'a Hex, palette: &'a Palette, conditions: &'a ConditionMap) -> Self {
        Self {
            prominent,
            palette,
            conditions,
        }
    }

    /// The most prominent saturated color of the image.
    pub fn prominent(&self) -> Color {
        Color::Hex(self.prominent.clone())
    }

    /// A slot filled earlier in this pass.
    pub fn slot(&self, name: &str) -> Option<Color> {
        self.palette.get(name).cloned().map(Color::Hex)
    }

    pub fn condition(&self, name: &str) -> Option<&'a HslCondition> {
        self.conditions.get(name)
    }

    /// Coerces into the named rule's condition; unchanged if there is no such rule.
    pub fn coerce_to(&self, color: Color, rule: &str) -> Color {
        match self.condition(rule) {
            Some(condition) => coerce(&color, condition),
            None => color,
        }
    }
}

/// A required slot and its optional derivation.
pub struct Slot {
    name: String,
    derivation: Option<Derivation>,
}

impl Slot {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn derivation(&self) -> Option<&Derivation> {
        self.derivation.as_ref()
    }

    /// Runs the derivation, if there is one.
    pub fn derive(&self, ctx: &DeriveContext<'_>) -> Option<Color> {
        self.derivation.as_ref().and_then(|derive| derive(ctx))
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("name", &self.name)
            .field("derivable", &self.derivation.is_some())
            .finish()
    }
}

/// Ordered list of required slots.
#[derive(Debug, Default)]
pub struct SlotPlan {
    slots: Vec<Slot>,
}

/// Hue slots and the pure color each one is mixed from.
pub const HUE_SEEDS: [(&str, (u8, u8, u8)); 8] = [
    ("red", (0xff, 0x00, 0x00)),
    ("orange", (0xff, 0x88, 0x00)),
    ("brown", (0x88, 0x44, 0x00)),
    ("yellow", (0xff, 0xff, 0x00)),
    ("green", (0x00, 0xff, 0x00)),
    ("blue", (0x00, 0x00, 0xff)),
    ("cyan", (0x00, 0xff, 0xff)),
    ("magenta", (0xff, 0x00, 0xff)),
];

impl SlotPlan {
    /// An empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a slot filled by `derivation` when classification leaves it empty.
    #[must_use]
    pub fn derived<F>(mut self, name: impl Into<String>, derivation: F) -> Self
    where
        F: Fn(&DeriveContext<'_>) -> Option<Color> + Send + Sync + 'static,
    {
        self.push(name.into(), Some(Box::new(derivation)));
        self
    }

    /// Appends a slot only classification can fill.
    #[must_use]
    pub fn required(mut self, name: impl Into<String>) -> Self {
        self.push(name.into(), None);
        self
    }

    fn push(&mut self, name: String, derivation: Option<Derivation>) {
        match self.slots.iter_mut().find(|slot| slot.name == name) {
            Some(slot) => slot.derivation = derivation,
            None => self.slots.push(Slot { name, derivation }),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Slot> {
        self.slots.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(Slot::name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names().any(|slot| slot == name)
    }

    /// The standard terminal theme.
    ///
    /// `accent`, `black` and `white` come first since every later slot reads
    /// at least one of them.
    pub fn standard() -> Self {
        let mut plan = Self::new()
            .derived("accent", accent)
            .derived("black", black)
            .derived("white", white)
            .derived("bright_black", |ctx| Some(ctx.slot("black")?.lighten(0.1)))
            .derived("bright_white", |ctx| Some(ctx.slot("white")?.lighten(0.1)))
            .derived("accent_bg", |ctx| {
                Some(ctx.slot("accent")?.desaturate(0.2).darken(0.1))
            })
            .derived("accent_fg", |ctx| Some(ctx.slot("white")?.lighten(0.15)));

        for (name, amount) in [
            ("foreground", 0.08),
            ("foreground_alt", 0.10),
            ("foreground_unfocus", 0.12),
        ] {
            plan = plan.derived(name, move |ctx| foreground(ctx, amount));
        }
        for (name, amount) in [
            ("background", 0.08),
            ("background_alt", 0.10),
            ("background_unfocus", 0.12),
        ] {
            plan = plan.derived(name, move |ctx| background(ctx, amount));
        }
        for (name, seed) in HUE_SEEDS {
            plan = plan.derived(name, move |ctx| hue(ctx, name, seed));
        }
        for (name, seed) in HUE_SEEDS {
            plan = plan.derived(format!("bright_{name}"), move |ctx| {
                let base = hue(ctx, name, seed)?.to_hex();
                Some(Color::Hex(base).lighten(0.15))
            });
        }
        plan
    }
}

impl<'a> IntoIterator for &'a SlotPlan {
    type Item = &'a Slot;
    type IntoIter = std::slice::Iter<'a, Slot>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter()
    }
}

fn accent(ctx: &DeriveContext<'_>) -> Option<Color> {
    Some(ctx.coerce_to(ctx.prominent().saturate(0.1), "accent"))
}

fn black(ctx: &DeriveContext<'_>) -> Option<Color> {
    let p = ctx.prominent();
    let color = p.darken(0.4).blend(&p, 0.2).lighten(0.4).blend(&p, 0.1);
    Some(ctx.coerce_to(color, "black"))
}

fn white(ctx: &DeriveContext<'_>) -> Option<Color> {
    let p = ctx.prominent();
    let color = p.lighten(0.4).blend(&p, 0.2).darken(0.4).blend(&p, 0.1);
    Some(ctx.coerce_to(color, "white"))
}

/// Lightness halfway between `base` and the accent, applied to `base`.
fn average_lightness(base: &Color, accent: &Color) -> Color {
    let hsl = base.to_hsl();
    let l = 0.5f64.mul_add(hsl.l(), 0.5 * accent.to_hsl().l());
    Color::NormalizedHsl(hsl.with_lightness(l))
}

fn foreground(ctx: &DeriveContext<'_>, amount: f64) -> Option<Color> {
    let base = average_lightness(&ctx.slot("white")?, &ctx.slot("accent")?);
    Some(ctx.coerce_to(base.lighten(amount), "foreground"))
}

fn background(ctx: &DeriveContext<'_>, amount: f64) -> Option<Color> {
    let base = average_lightness(&ctx.slot("black")?, &ctx.slot("accent")?);
    Some(ctx.coerce_to(base.darken(amount), "background"))
}

fn hue(ctx: &DeriveContext<'_>, rule: &str, (r, g, b): (u8, u8, u8)) -> Option<Color> {
    let white = ctx.slot("white")?;
    let accent = ctx.slot("accent")?;

    let seed = Color::Hex(Hex::from_bytes(r, g, b));
    let seed_hsl = seed.to_hsl();
    let mix = if seed_hsl.l() < 0.3 {
        Color::NormalizedHsl(seed_hsl.with_lightness(0.45))
    } else {
        seed.darken(0.25)
    };

    let color = white
        .blend(&mix, 0.75)
        .blend(&accent, 0.15)
        .saturate(0.2)
        .darken(0.2)
        .blend(&mix, 0.15)
        .lighten(0.25);
    Some(ctx.coerce_to(color, rule))
}

//! Dietary tag inference
//!
//! Each tag gets its own decision function that sees every signal at once and returns
//! a final include/exclude verdict with the reason behind it. There is no shared
//! working set that later passes patch up, so a tag's outcome never depends on the
//! order other tags were evaluated in.
//!
//! Safety rules baked into the verdicts:
//! - meat or seafood excludes vegetarian and vegan, whatever the text or stored tags claim
//! - vegan needs a claim (text or stored tag) and no meat, seafood, dairy, egg or honey
//! - vegetarian is granted whenever meat and seafood are absent
//! - gluten-free is only ever granted on a claim, never from absence of gluten keywords
//! - dairy-free needs a claim and no dairy keyword, unless vegan was granted

use std::collections::BTreeSet;

use menuwise_shared::{DietaryTag, FoodListing};
use serde::Serialize;
use strum::VariantArray;

use crate::{Signals, listing_blob};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Reason {
    ExplicitClaim,
    ExistingTag,
    VeganCascade,
    NoAnimalProtein,
    MeatOrSeafood,
    DairyDetected,
    EggDetected,
    HoneyDetected,
    GlutenDetected,
    NoClaim,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TagDecision {
    pub tag: DietaryTag,
    pub included: bool,
    pub reason: Reason,
}

impl TagDecision {
    fn include(tag: DietaryTag, reason: Reason) -> Self {
        Self {
            tag,
            included: true,
            reason,
        }
    }

    fn exclude(tag: DietaryTag, reason: Reason) -> Self {
        Self {
            tag,
            included: false,
            reason,
        }
    }
}

/// Text signals plus the stored tags of one listing.
#[derive(Debug, Clone, Default)]
pub struct Evidence {
    pub signals: Signals,
    pub existing: BTreeSet<DietaryTag>,
}

impl Evidence {
    pub fn new<'a>(signals: Signals, stored_tags: impl IntoIterator<Item = &'a String>) -> Self {
        Self {
            signals,
            existing: stored_tags
                .into_iter()
                .filter_map(|tag| DietaryTag::parse_lenient(tag))
                .collect(),
        }
    }

    fn claimed(&self, tag: DietaryTag) -> Option<Reason> {
        if self.signals.claims(tag) {
            Some(Reason::ExplicitClaim)
        } else if self.existing.contains(&tag) {
            Some(Reason::ExistingTag)
        } else {
            None
        }
    }

    fn vegan_admitted(&self) -> bool {
        self.signals.vegan_safe() && self.claimed(DietaryTag::Vegan).is_some()
    }
}

pub fn decide(tag: DietaryTag, evidence: &Evidence) -> TagDecision {
    match tag {
        DietaryTag::Vegan => decide_vegan(evidence),
        DietaryTag::Vegetarian => decide_vegetarian(evidence),
        DietaryTag::GlutenFree => decide_gluten_free(evidence),
        DietaryTag::DairyFree => decide_dairy_free(evidence),
    }
}

fn decide_vegan(evidence: &Evidence) -> TagDecision {
    let tag = DietaryTag::Vegan;
    let signals = &evidence.signals;

    if !signals.vegetarian_safe() {
        return TagDecision::exclude(tag, Reason::MeatOrSeafood);
    }
    if signals.has_dairy {
        return TagDecision::exclude(tag, Reason::DairyDetected);
    }
    if signals.has_egg {
        return TagDecision::exclude(tag, Reason::EggDetected);
    }
    if signals.has_honey {
        return TagDecision::exclude(tag, Reason::HoneyDetected);
    }

    match evidence.claimed(tag) {
        Some(reason) => TagDecision::include(tag, reason),
        None => TagDecision::exclude(tag, Reason::NoClaim),
    }
}

fn decide_vegetarian(evidence: &Evidence) -> TagDecision {
    let tag = DietaryTag::Vegetarian;

    if !evidence.signals.vegetarian_safe() {
        return TagDecision::exclude(tag, Reason::MeatOrSeafood);
    }
    if evidence.vegan_admitted() {
        return TagDecision::include(tag, Reason::VeganCascade);
    }

    let reason = evidence.claimed(tag).unwrap_or(Reason::NoAnimalProtein);
    TagDecision::include(tag, reason)
}

fn decide_gluten_free(evidence: &Evidence) -> TagDecision {
    let tag = DietaryTag::GlutenFree;

    match evidence.claimed(tag) {
        Some(reason) => TagDecision::include(tag, reason),
        None if evidence.signals.has_gluten => TagDecision::exclude(tag, Reason::GlutenDetected),
        None => TagDecision::exclude(tag, Reason::NoClaim),
    }
}

fn decide_dairy_free(evidence: &Evidence) -> TagDecision {
    let tag = DietaryTag::DairyFree;

    if evidence.vegan_admitted() {
        return TagDecision::include(tag, Reason::VeganCascade);
    }
    if evidence.signals.has_dairy {
        return TagDecision::exclude(tag, Reason::DairyDetected);
    }

    match evidence.claimed(tag) {
        Some(reason) => TagDecision::include(tag, reason),
        None => TagDecision::exclude(tag, Reason::NoClaim),
    }
}

/// One decision per [`DietaryTag`], in declaration order.
pub fn explain_blob(blob: &str, stored_tags: &[String]) -> Vec<TagDecision> {
    let evidence = Evidence::new(Signals::detect(blob), stored_tags);

    let decisions = DietaryTag::VARIANTS
        .iter()
        .map(|tag| decide(*tag, &evidence))
        .collect::<Vec<_>>();

    tracing::debug!(signals = ?evidence.signals, ?decisions, "dietary tags decided");

    decisions
}

pub fn explain_dietary_tags(listing: &FoodListing) -> Vec<TagDecision> {
    explain_blob(&listing_blob(listing), &listing.tags)
}

pub fn included_tags(decisions: &[TagDecision]) -> BTreeSet<DietaryTag> {
    decisions
        .iter()
        .filter(|decision| decision.included)
        .map(|decision| decision.tag)
        .collect()
}

/// Conflict-resolved dietary tags for a listing. Never fails; may be empty.
pub fn infer_dietary_tags(listing: &FoodListing) -> BTreeSet<DietaryTag> {
    included_tags(&explain_dietary_tags(listing))
}

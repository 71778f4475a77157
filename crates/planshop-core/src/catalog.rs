//! The subscription plan catalog.
//!
//! Plans are immutable and loaded from a fixed in-process list. The
//! catalog is constructed once at startup and handed to the components
//! that need it; nothing mutates it afterwards.

use serde::{Deserialize, Serialize};

/// A purchasable subscription plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    /// Plan identifier slug, e.g. `capcut-pro-monthly`.
    pub id: String,

    /// Name of the subscribed service, e.g. "CapCut".
    pub service_name: String,

    /// Name of the plan tier, e.g. "Pro Monthly".
    pub plan_name: String,

    /// Price in integer cents.
    pub price_cents: i64,

    /// ISO currency code, e.g. "USD".
    pub currency: String,

    /// Billing period label, e.g. "monthly".
    pub duration: String,

    /// Marketing feature list.
    pub features: Vec<String>,

    /// Image URL for storefront display.
    pub image_url: String,

    /// Whether the plan is currently purchasable.
    pub is_active: bool,
}

impl Plan {
    /// Price formatted as dollars, e.g. `$9.99`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn price_formatted(&self) -> String {
        format!("${:.2}", self.price_cents as f64 / 100.0)
    }
}

/// The fixed set of purchasable plans.
#[derive(Debug, Clone)]
pub struct Catalog {
    plans: Vec<Plan>,
}

impl Catalog {
    /// Build a catalog from an explicit plan list.
    #[must_use]
    pub fn new(plans: Vec<Plan>) -> Self {
        Self { plans }
    }

    /// The built-in storefront catalog.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(builtin_plans())
    }

    /// All active plans, in catalog order.
    pub fn active_plans(&self) -> impl Iterator<Item = &Plan> {
        self.plans.iter().filter(|p| p.is_active)
    }

    /// Look up a plan by identifier.
    #[must_use]
    pub fn find(&self, plan_id: &str) -> Option<&Plan> {
        self.plans.iter().find(|p| p.id == plan_id)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn plan(
    id: &str,
    service_name: &str,
    plan_name: &str,
    price_cents: i64,
    features: &[&str],
    image_url: &str,
) -> Plan {
    Plan {
        id: id.into(),
        service_name: service_name.into(),
        plan_name: plan_name.into(),
        price_cents,
        currency: "USD".into(),
        duration: "monthly".into(),
        features: features.iter().map(|&f| f.into()).collect(),
        image_url: image_url.into(),
        is_active: true,
    }
}

fn builtin_plans() -> Vec<Plan> {
    vec![
        plan(
            "capcut-pro-monthly",
            "CapCut",
            "Pro Monthly",
            999,
            &[
                "HD video exports",
                "Premium effects & filters",
                "Advanced editing tools",
                "Cloud storage",
                "No watermark",
            ],
            "https://images.unsplash.com/photo-1574717024653-61fd2cf4d44d",
        ),
        plan(
            "canva-pro-monthly",
            "Canva",
            "Pro Monthly",
            1299,
            &[
                "Premium templates",
                "Background remover",
                "Brand kit tools",
                "Team collaboration",
                "Unlimited storage",
            ],
            "https://images.unsplash.com/photo-1574717025058-2f8737d2e2b7",
        ),
        plan(
            "chatgpt-plus-monthly",
            "ChatGPT",
            "Plus Monthly",
            2000,
            &[
                "GPT-4 access",
                "Faster response times",
                "Priority access",
                "Custom instructions",
                "Advanced data analysis",
            ],
            "https://images.unsplash.com/photo-1712002641088-9d76f9080889",
        ),
        plan(
            "adobe-creative-monthly",
            "Adobe Creative Cloud",
            "All Apps Monthly",
            5499,
            &[
                "All Creative Cloud apps",
                "100GB cloud storage",
                "Premium fonts",
                "Creative tutorials",
                "Portfolio website",
            ],
            "https://images.unsplash.com/photo-1740174459699-487aec1f7bc5",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_has_four_active_plans() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.active_plans().count(), 4);
    }

    #[test]
    fn find_known_plan() {
        let catalog = Catalog::builtin();
        let plan = catalog.find("capcut-pro-monthly").unwrap();
        assert_eq!(plan.price_cents, 999);
        assert_eq!(plan.currency, "USD");
        assert_eq!(plan.service_name, "CapCut");
    }

    #[test]
    fn find_unknown_plan_is_none() {
        let catalog = Catalog::builtin();
        assert!(catalog.find("netflix-4k-monthly").is_none());
    }

    #[test]
    fn price_formatting() {
        let catalog = Catalog::builtin();
        assert_eq!(
            catalog.find("capcut-pro-monthly").unwrap().price_formatted(),
            "$9.99"
        );
        assert_eq!(
            catalog.find("chatgpt-plus-monthly").unwrap().price_formatted(),
            "$20.00"
        );
    }

    #[test]
    fn inactive_plans_are_hidden_from_listing_but_still_found() {
        let mut plans = builtin_plans();
        plans[0].is_active = false;
        let retired_id = plans[0].id.clone();
        let catalog = Catalog::new(plans);

        assert_eq!(catalog.active_plans().count(), 3);
        assert!(catalog.find(&retired_id).is_some());
    }
}

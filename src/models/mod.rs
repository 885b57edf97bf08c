//! Plan routing and static pricing.
//!
//! The plan catalog is fixed configuration: there is no plan storage behind
//! this service. Amounts are in minor currency units.

/// All paid sessions are priced in a single fixed currency.
pub const CHECKOUT_CURRENCY: &str = "usd";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingCycle {
    Monthly,
    Annual,
}

impl BillingCycle {
    /// Exact match on `"annual"`; every other value (including absent)
    /// bills monthly.
    pub fn from_request(value: Option<&str>) -> Self {
        match value {
            Some("annual") => BillingCycle::Annual,
            _ => BillingCycle::Monthly,
        }
    }

    /// Recurring interval in the payments provider's vocabulary.
    pub fn interval(self) -> &'static str {
        match self {
            BillingCycle::Monthly => "month",
            BillingCycle::Annual => "year",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BillingCycle::Monthly => "monthly",
            BillingCycle::Annual => "annual",
        }
    }
}

/// A subscription tier that goes through hosted checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedPlan {
    pub name: &'static str,
    pub monthly_minor: u64,
    pub annual_minor: u64,
}

impl PricedPlan {
    pub fn unit_amount(&self, cycle: BillingCycle) -> u64 {
        match cycle {
            BillingCycle::Monthly => self.monthly_minor,
            BillingCycle::Annual => self.annual_minor,
        }
    }
}

pub const STARTUP_PLAN: PricedPlan = PricedPlan {
    name: "Startup Plan",
    monthly_minor: 1499,
    annual_minor: 14390,
};

pub const BUSINESS_PLAN: PricedPlan = PricedPlan {
    name: "Business Plan",
    monthly_minor: 4999,
    annual_minor: 47990,
};

/// Default tier for plan names the catalog does not recognize.
pub const BASIC_PLAN: PricedPlan = PricedPlan {
    name: "Basic Plan",
    monthly_minor: 1499,
    annual_minor: 14390,
};

/// Outcome of plan routing: exactly one of these per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanRoute {
    /// Free tier: no payment session, straight to the dashboard.
    Dashboard,
    /// Enterprise: handled by sales, straight to the contact page.
    Contact,
    /// Everything else goes through hosted checkout.
    Paid(PricedPlan),
}

/// Case-sensitive plan routing.
///
/// Unrecognized plan names (including a missing plan) are not rejected; they
/// fall back to Basic Plan pricing. Compatibility behavior carried over from
/// the pricing page this service fronts.
pub fn route_plan(plan: Option<&str>) -> PlanRoute {
    match plan.unwrap_or("") {
        "Free" => PlanRoute::Dashboard,
        "Enterprise" => PlanRoute::Contact,
        "Startup" => PlanRoute::Paid(STARTUP_PLAN),
        "Business" => PlanRoute::Paid(BUSINESS_PLAN),
        _ => PlanRoute::Paid(BASIC_PLAN),
    }
}

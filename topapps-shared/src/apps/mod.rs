/// App listing queries
///
/// - `filter`: the visibility/search predicate shared by counts and listings
/// - `count`: number of apps matching a filter
/// - `list`: cost-ranked public listing and member/owner listings
/// - `stats`: per-app cost, token, user, transaction and earnings figures
///
/// Everything here is read-only.

pub mod count;
pub mod filter;
pub mod list;
pub mod stats;

pub use count::count_apps;
pub use filter::{AppFilter, MembershipScope, Visibility};
pub use list::{list_member_apps, list_public_apps};
pub use stats::AppStats;

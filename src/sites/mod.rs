//! # Site Allocation
//!
//! Distributes the cations of a formula over an ordered list of
//! crystallographic sites, each with a fixed capacity and a species priority
//! list. The allocator knows nothing about minerals; [`SiteScheme`] supplies
//! the published layouts.
//!
//! One analysis is a fold over the sites: each step takes the current pools
//! and returns the depleted pools plus what the site took.
//!
//! ```
//! use std::collections::BTreeMap;
//! use probecalc::sites::{Site, SiteAllocator};
//!
//! let allocator = SiteAllocator::new(vec![Site::new("T", 2.0, &["Al", "Fe3", "Cr"])])?;
//! let pools: BTreeMap<String, f64> =
//!     [("Al", 1.5), ("Fe3", 1.0), ("Cr", 0.2)].map(|(s, v)| (s.to_string(), v)).into();
//!
//! let row = allocator.allocate_row(&pools);
//! assert_eq!(row.sites[0].assigned("Fe3"), 0.5);
//! assert_eq!(row.unassigned["Cr"], 0.2);
//! # Ok::<(), probecalc::error::CalcError>(())
//! ```

mod allocator;
mod assignment;
mod schemes;


pub use allocator::{fill_site, Pools, RowAllocation, Site, SiteAllocator, SiteFill};
pub use assignment::SiteAssignment;
pub use schemes::SiteScheme;

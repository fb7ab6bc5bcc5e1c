//! Subject ID
//!
//! Identifies an authenticated account: a credential record and the
//! profile created with it share this id.

use kernel::id::Id;

/// Marker type for [`SubjectId`]
pub struct SubjectMarker;

pub type SubjectId = Id<SubjectMarker>;

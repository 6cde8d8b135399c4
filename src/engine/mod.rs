//! Scoring rules. Every function takes a [`Match`](crate::model::Match) by
//! value and hands back the changed match, or an error with the input dropped;
//! callers keep their own copy for the rejected case.

pub(crate) mod aggregate;
pub(crate) mod lifecycle;
pub(crate) mod over;

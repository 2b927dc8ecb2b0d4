//! Pagination options for the device listing endpoints.

// self
use crate::{_prelude::*, error::ValidationError};

/// Largest page size the device endpoints accept.
pub const MAX_DEVICE_LIMIT: u32 = 1000;

/// Single pagination option, applied in the order supplied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeviceRequestOption {
	/// Opaque continuation token from a previous response.
	Cursor(String),
	/// Page size, at most 1000. `0` clears the limit so the server default applies.
	Limit(u32),
}
impl DeviceRequestOption {
	/// Cursor option.
	pub fn cursor(cursor: impl Into<String>) -> Self {
		Self::Cursor(cursor.into())
	}

	/// Limit option.
	pub fn limit(limit: u32) -> Self {
		Self::Limit(limit)
	}

	/// Writes this option into `options`, rejecting limits above [`MAX_DEVICE_LIMIT`] without
	/// touching them.
	pub fn apply(&self, options: &mut DeviceRequestOptions) -> Result<(), ValidationError> {
		match self {
			Self::Cursor(cursor) => options.cursor = Some(cursor.clone()),
			Self::Limit(0) => options.limit = None,
			Self::Limit(limit) => {
				if *limit > MAX_DEVICE_LIMIT {
					return Err(ValidationError::LimitOutOfRange {
						limit: *limit,
						max: MAX_DEVICE_LIMIT,
					});
				}

				options.limit = Some(*limit);
			},
		}

		Ok(())
	}
}

/// Request body sent to the fetch and sync endpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DeviceRequestOptions {
	/// Continuation token.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub cursor: Option<String>,
	/// Page size.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub limit: Option<u32>,
}
impl DeviceRequestOptions {
	/// Seeds the body with a cursor before options are applied.
	pub fn with_cursor(cursor: impl Into<String>) -> Self {
		Self { cursor: Some(cursor.into()), limit: None }
	}

	/// Applies `options` in order; the last write to a field wins.
	pub fn apply_all<'a>(
		mut self,
		options: impl IntoIterator<Item = &'a DeviceRequestOption>,
	) -> Result<Self, ValidationError> {
		for option in options {
			option.apply(&mut self)?;
		}

		Ok(self)
	}
}

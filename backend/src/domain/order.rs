//! Shop orders owned by a single account.
//!
//! Prices are integer minor units (e.g. kopiykas or cents) so totals never
//! suffer floating point drift.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::note::{BoundError, bounded_text};
use super::{AccessError, AccountId, Email};

/// Maximum delivery address length, in characters.
pub const DELIVERY_ADDRESS_MAX: usize = 300;
/// Maximum item name length, in characters.
pub const ITEM_NAME_MAX: usize = 100;
/// Maximum number of lines in one order.
pub const ORDER_LINES_MAX: usize = 50;
/// Largest quantity accepted on a single line.
pub const QUANTITY_MAX: u32 = 99;

/// Validation errors raised for order fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderValidationError {
    InvalidId,
    InvalidContactEmail { reason: String },
    EmptyDeliveryAddress,
    DeliveryAddressTooLong { max: usize },
    NoLines,
    TooManyLines { max: usize },
    EmptyItemName { line: usize },
    ItemNameTooLong { line: usize, max: usize },
    ZeroUnitPrice { line: usize },
    QuantityOutOfRange { line: usize, max: u32 },
    UnknownStatus { value: String },
}

impl OrderValidationError {
    /// Name of the offending input field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "id",
            Self::InvalidContactEmail { .. } => "contactEmail",
            Self::EmptyDeliveryAddress | Self::DeliveryAddressTooLong { .. } => "deliveryAddress",
            Self::NoLines
            | Self::TooManyLines { .. }
            | Self::EmptyItemName { .. }
            | Self::ItemNameTooLong { .. }
            | Self::ZeroUnitPrice { .. }
            | Self::QuantityOutOfRange { .. } => "lines",
            Self::UnknownStatus { .. } => "status",
        }
    }
}

impl fmt::Display for OrderValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "order id must be a valid UUID"),
            Self::InvalidContactEmail { reason } => write!(f, "contact email is invalid: {reason}"),
            Self::EmptyDeliveryAddress => write!(f, "delivery address must not be empty"),
            Self::DeliveryAddressTooLong { max } => {
                write!(f, "delivery address must be at most {max} characters")
            }
            Self::NoLines => write!(f, "an order needs at least one line"),
            Self::TooManyLines { max } => write!(f, "an order may have at most {max} lines"),
            Self::EmptyItemName { line } => write!(f, "line {line}: item name must not be empty"),
            Self::ItemNameTooLong { line, max } => {
                write!(f, "line {line}: item name must be at most {max} characters")
            }
            Self::ZeroUnitPrice { line } => write!(f, "line {line}: unit price must be positive"),
            Self::QuantityOutOfRange { line, max } => {
                write!(f, "line {line}: quantity must be between 1 and {max}")
            }
            Self::UnknownStatus { value } => write!(
                f,
                "unknown status '{value}'; expected pending, confirmed, delivered or cancelled",
            ),
        }
    }
}

impl std::error::Error for OrderValidationError {}

impl From<OrderValidationError> for AccessError {
    fn from(value: OrderValidationError) -> Self {
        AccessError::validation(value.field(), value)
    }
}

/// Stable order identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OrderId(Uuid);

impl OrderId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for OrderId {
    type Err = OrderValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| OrderValidationError::InvalidId)
    }
}

/// Fulfilment state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Delivered,
    Cancelled,
}

impl FromStr for OrderStatus {
    type Err = OrderValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(OrderValidationError::UnknownStatus { value: s.to_owned() }),
        }
    }
}

/// Raw line input for a new order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLineDraft {
    pub item_name: String,
    pub unit_price_minor: u32,
    pub quantity: u32,
}

/// One validated order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    item_name: String,
    unit_price_minor: u32,
    quantity: u32,
}

impl OrderLine {
    /// Validate a line; `line` is its 1-based position, used in messages.
    fn from_draft(line: usize, draft: &OrderLineDraft) -> Result<Self, OrderValidationError> {
        let item_name = bounded_text(&draft.item_name, ITEM_NAME_MAX).map_err(|err| match err {
            BoundError::Empty => OrderValidationError::EmptyItemName { line },
            BoundError::TooLong => OrderValidationError::ItemNameTooLong {
                line,
                max: ITEM_NAME_MAX,
            },
        })?;
        if draft.unit_price_minor == 0 {
            return Err(OrderValidationError::ZeroUnitPrice { line });
        }
        if !(1..=QUANTITY_MAX).contains(&draft.quantity) {
            return Err(OrderValidationError::QuantityOutOfRange {
                line,
                max: QUANTITY_MAX,
            });
        }
        Ok(Self {
            item_name,
            unit_price_minor: draft.unit_price_minor,
            quantity: draft.quantity,
        })
    }

    pub fn item_name(&self) -> &str {
        self.item_name.as_str()
    }

    pub fn unit_price_minor(&self) -> u32 {
        self.unit_price_minor
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Price times quantity; cannot overflow `u64`.
    pub fn subtotal_minor(&self) -> u64 {
        u64::from(self.unit_price_minor) * u64::from(self.quantity)
    }
}

fn contact_email(raw: &str) -> Result<Email, OrderValidationError> {
    Email::new(raw).map_err(|err| OrderValidationError::InvalidContactEmail {
        reason: err.to_string(),
    })
}

fn delivery_address(raw: &str) -> Result<String, OrderValidationError> {
    bounded_text(raw, DELIVERY_ADDRESS_MAX).map_err(|err| match err {
        BoundError::Empty => OrderValidationError::EmptyDeliveryAddress,
        BoundError::TooLong => OrderValidationError::DeliveryAddressTooLong {
            max: DELIVERY_ADDRESS_MAX,
        },
    })
}

/// Raw fields for a new order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    pub contact_email: String,
    pub delivery_address: String,
    pub lines: Vec<OrderLineDraft>,
}

/// Validated contents of an [`OrderDraft`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedOrder {
    pub contact_email: Email,
    pub delivery_address: String,
    pub lines: Vec<OrderLine>,
}

impl OrderDraft {
    /// Validate every field; nothing is truncated.
    pub fn validate(&self) -> Result<ValidatedOrder, OrderValidationError> {
        let contact_email = contact_email(&self.contact_email)?;
        let delivery_address = delivery_address(&self.delivery_address)?;
        if self.lines.is_empty() {
            return Err(OrderValidationError::NoLines);
        }
        if self.lines.len() > ORDER_LINES_MAX {
            return Err(OrderValidationError::TooManyLines {
                max: ORDER_LINES_MAX,
            });
        }
        let lines = self
            .lines
            .iter()
            .enumerate()
            .map(|(index, line)| OrderLine::from_draft(index + 1, line))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ValidatedOrder {
            contact_email,
            delivery_address,
            lines,
        })
    }
}

/// Partial update for an order. Lines are fixed once placed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderPatch {
    pub contact_email: Option<String>,
    pub delivery_address: Option<String>,
    pub status: Option<OrderStatus>,
}

/// Validated contents of an [`OrderPatch`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedOrderPatch {
    pub contact_email: Option<Email>,
    pub delivery_address: Option<String>,
    pub status: Option<OrderStatus>,
}

impl OrderPatch {
    pub fn is_empty(&self) -> bool {
        self.contact_email.is_none() && self.delivery_address.is_none() && self.status.is_none()
    }

    /// Validate only the supplied fields.
    pub fn validate(&self) -> Result<ValidatedOrderPatch, OrderValidationError> {
        Ok(ValidatedOrderPatch {
            contact_email: self.contact_email.as_deref().map(contact_email).transpose()?,
            delivery_address: self
                .delivery_address
                .as_deref()
                .map(delivery_address)
                .transpose()?,
            status: self.status,
        })
    }
}

/// Order owned by exactly one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    id: OrderId,
    owner_id: AccountId,
    contact_email: Email,
    delivery_address: String,
    lines: Vec<OrderLine>,
    status: OrderStatus,
    total_minor: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Order {
    /// Place a new pending order.
    pub fn new(
        id: OrderId,
        owner_id: AccountId,
        contents: ValidatedOrder,
        created_at: DateTime<Utc>,
    ) -> Self {
        let ValidatedOrder {
            contact_email,
            delivery_address,
            lines,
        } = contents;
        let total_minor = lines.iter().map(OrderLine::subtotal_minor).sum();
        Self {
            id,
            owner_id,
            contact_email,
            delivery_address,
            lines,
            status: OrderStatus::Pending,
            total_minor,
            created_at,
            updated_at: created_at,
        }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn owner_id(&self) -> AccountId {
        self.owner_id
    }

    pub fn contact_email(&self) -> &Email {
        &self.contact_email
    }

    pub fn delivery_address(&self) -> &str {
        self.delivery_address.as_str()
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Sum of line subtotals in minor units.
    pub fn total_minor(&self) -> u64 {
        self.total_minor
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replace supplied fields and bump `updated_at`.
    pub fn revise(&mut self, patch: ValidatedOrderPatch, now: DateTime<Utc>) {
        let ValidatedOrderPatch {
            contact_email,
            delivery_address,
            status,
        } = patch;
        if let Some(contact_email) = contact_email {
            self.contact_email = contact_email;
        }
        if let Some(delivery_address) = delivery_address {
            self.delivery_address = delivery_address;
        }
        if let Some(status) = status {
            self.status = status;
        }
        self.updated_at = now;
    }
}

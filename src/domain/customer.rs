//! Customer domain entity and related types.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::image::encode_profile_picture;
use crate::config::GENERATED_CUSTOMER_CODE_LENGTH;
use crate::types::{default_page_number, default_page_size, PaginationParams};

/// Customer domain entity
#[derive(Clone, PartialEq, Eq)]
pub struct Customer {
    /// Short customer code, primary key
    pub id: String,
    pub name: String,
    /// Balance in cents, never negative
    pub current_balance_cents: i64,
    pub email: String,
    /// National identity number
    pub cedula: String,
    pub hashed_password: String,
    pub profile_picture: Option<Vec<u8>>,
}

// Keep the digest out of logs
impl std::fmt::Debug for Customer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Customer")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("current_balance_cents", &self.current_balance_cents)
            .field("email", &self.email)
            .field("cedula", &self.cedula)
            .field("hashed_password", &"[REDACTED]")
            .field(
                "profile_picture",
                &self.profile_picture.as_ref().map(|p| format!("{} bytes", p.len())),
            )
            .finish()
    }
}

/// Server-assigned customer code: uppercase hex taken from a random UUID.
pub fn generate_customer_code() -> String {
    Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(GENERATED_CUSTOMER_CODE_LENGTH)
        .collect::<String>()
        .to_uppercase()
}

/// Replacement values for an existing customer.
///
/// `None` for the password digest or the picture keeps the stored value.
#[derive(Debug, Clone)]
pub struct CustomerChanges {
    pub id: String,
    pub name: String,
    pub current_balance_cents: i64,
    pub email: String,
    pub cedula: String,
    pub hashed_password: Option<String>,
    pub profile_picture: Option<Vec<u8>>,
}

impl CustomerChanges {
    pub fn apply_to(self, customer: &mut Customer) {
        customer.name = self.name;
        customer.current_balance_cents = self.current_balance_cents;
        customer.email = self.email;
        customer.cedula = self.cedula;
        if let Some(hash) = self.hashed_password {
            customer.hashed_password = hash;
        }
        if let Some(picture) = self.profile_picture {
            customer.profile_picture = Some(picture);
        }
    }
}

/// Customer creation data transfer object
#[derive(Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCustomer {
    /// Customer code; assigned by the server when omitted
    #[serde(default)]
    #[schema(example = "BLAUS")]
    pub id: Option<String>,
    #[validate(length(min = 1, max = 40, message = "Name must be between 1 and 40 characters"))]
    #[schema(example = "Blauer See Delikatessen")]
    pub name: String,
    #[schema(example = 15075)]
    pub current_balance_cents: i64,
    #[validate(
        email(message = "Invalid email format"),
        length(max = 100, message = "Email must be at most 100 characters")
    )]
    #[schema(example = "blauer@demo.com")]
    pub email: String,
    #[validate(length(min = 1, max = 20, message = "Cedula must be between 1 and 20 characters"))]
    #[schema(example = "0000000004")]
    pub cedula: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    /// Optional picture, bare base64 or a data URI
    #[serde(default)]
    pub profile_picture_base64: Option<String>,
}

impl std::fmt::Debug for CreateCustomer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateCustomer")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

/// Customer update data transfer object
#[derive(Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateCustomer {
    #[schema(example = "ALFKI")]
    pub customer_id: String,
    #[validate(length(min = 1, max = 40, message = "Name must be between 1 and 40 characters"))]
    pub name: String,
    pub current_balance_cents: i64,
    #[validate(
        email(message = "Invalid email format"),
        length(max = 100, message = "Email must be at most 100 characters")
    )]
    pub email: String,
    #[validate(length(min = 1, max = 20, message = "Cedula must be between 1 and 20 characters"))]
    pub cedula: String,
    /// Omitted or empty keeps the stored picture
    #[serde(default)]
    pub profile_picture_base64: Option<String>,
    /// Omitted or empty keeps the stored password
    #[serde(default)]
    pub password: Option<String>,
}

impl UpdateCustomer {
    /// The new plaintext password, if one was actually supplied.
    pub fn new_password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }
}

impl std::fmt::Debug for UpdateCustomer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateCustomer")
            .field("customer_id", &self.customer_id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

/// Customer response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CustomerResponse {
    #[schema(example = "ALFKI")]
    pub id: String,
    #[schema(example = "Alfreds Futterkiste")]
    pub name: String,
    #[schema(example = 0)]
    pub current_balance_cents: i64,
    #[schema(example = "alfreds@demo.com")]
    pub email: String,
    #[schema(example = "0000000001")]
    pub cedula: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture_base64: Option<String>,
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        Self {
            profile_picture_base64: customer
                .profile_picture
                .as_deref()
                .map(encode_profile_picture),
            id: customer.id,
            name: customer.name,
            current_balance_cents: customer.current_balance_cents,
            email: customer.email,
            cedula: customer.cedula,
        }
    }
}

/// Columns a customer listing can be ordered by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CustomerSortField {
    #[default]
    Id,
    Name,
    Email,
    Balance,
}

/// Customer listing query
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GetCustomersQuery {
    /// 1-based page number
    #[serde(default = "default_page_number")]
    pub page_number: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    #[serde(default)]
    pub order_by: Option<CustomerSortField>,
    #[serde(default)]
    pub order_descending: bool,
}

impl GetCustomersQuery {
    pub fn new(page_number: u64, page_size: u64) -> Self {
        Self {
            page_number,
            page_size,
            order_by: None,
            order_descending: false,
        }
    }

    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page_number, self.page_size)
    }

    pub fn sort(&self) -> CustomerSort {
        CustomerSort {
            field: self.order_by.unwrap_or_default(),
            descending: self.order_descending,
        }
    }
}

/// Resolved ordering for a customer listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CustomerSort {
    pub field: CustomerSortField,
    pub descending: bool,
}

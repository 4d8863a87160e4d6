//! Business-rule validators for the customer and product use cases.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{CUSTOMER_CODE_COLUMN_LENGTH, MAX_BALANCE_CENTS, MIN_PASSWORD_LENGTH};
use crate::domain::{
    CreateCustomer, CreateProduct, ModelValidator, UpdateCustomer, ValidationConstraint,
    ValidationErrors,
};
use crate::errors::AppResult;
use crate::infra::{CustomerQueries, ProductQueries};

/// Fields shared by the create and update customer requests
struct CustomerCandidate<'a> {
    id: Option<&'a str>,
    name: &'a str,
    email: &'a str,
    cedula: &'a str,
    current_balance_cents: i64,
}

/// Uniqueness and range rules for customers.
///
/// Only runs once the field rules pass, so malformed input never reaches
/// the uniqueness queries.
pub struct CustomerRules {
    customers: Arc<dyn CustomerQueries>,
    code_max_length: usize,
}

impl CustomerRules {
    /// `code_max_length` is capped at the width of the code column.
    pub fn new(customers: Arc<dyn CustomerQueries>, code_max_length: usize) -> Self {
        Self {
            customers,
            code_max_length: code_max_length.min(CUSTOMER_CODE_COLUMN_LENGTH),
        }
    }

    /// Evaluate every rule. `excluding_id` names the customer being updated.
    async fn check(
        &self,
        candidate: CustomerCandidate<'_>,
        excluding_id: Option<&str>,
    ) -> AppResult<ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self
            .customers
            .customer_name_exists(candidate.name, excluding_id)
            .await?
        {
            errors.push(
                "name",
                format!("Customer '{}' is already registered.", candidate.name),
            );
        }

        if self
            .customers
            .customer_email_exists(candidate.email, excluding_id)
            .await?
        {
            errors.push(
                "email",
                format!("Email '{}' is already registered.", candidate.email),
            );
        }

        if self
            .customers
            .customer_cedula_exists(candidate.cedula, excluding_id)
            .await?
        {
            errors.push(
                "cedula",
                format!("Cedula '{}' is already registered.", candidate.cedula),
            );
        }

        if let Some(id) = candidate.id {
            if id.chars().count() > self.code_max_length {
                errors.push(
                    "id",
                    format!(
                        "Customer code must be at most {} characters.",
                        self.code_max_length
                    ),
                );
            }
        }

        if candidate.current_balance_cents < 0 {
            errors.push("current_balance_cents", "Current balance cannot be negative.");
        } else if candidate.current_balance_cents > MAX_BALANCE_CENTS {
            errors.push(
                "current_balance_cents",
                format!("Current balance cannot exceed {} cents.", MAX_BALANCE_CENTS),
            );
        }

        Ok(errors)
    }
}

#[async_trait]
impl ModelValidator<CreateCustomer> for CustomerRules {
    fn constraint(&self) -> ValidationConstraint {
        ValidationConstraint::ValidateIfThereAreNoPreviousErrors
    }

    async fn validate(&self, model: &CreateCustomer) -> AppResult<ValidationErrors> {
        let candidate = CustomerCandidate {
            id: model.id.as_deref().filter(|id| !id.trim().is_empty()),
            name: &model.name,
            email: &model.email,
            cedula: &model.cedula,
            current_balance_cents: model.current_balance_cents,
        };
        self.check(candidate, None).await
    }
}

#[async_trait]
impl ModelValidator<UpdateCustomer> for CustomerRules {
    fn constraint(&self) -> ValidationConstraint {
        ValidationConstraint::ValidateIfThereAreNoPreviousErrors
    }

    async fn validate(&self, model: &UpdateCustomer) -> AppResult<ValidationErrors> {
        let candidate = CustomerCandidate {
            id: Some(&model.customer_id),
            name: &model.name,
            email: &model.email,
            cedula: &model.cedula,
            current_balance_cents: model.current_balance_cents,
        };
        let mut errors = self.check(candidate, Some(&model.customer_id)).await?;

        if let Some(password) = model.new_password() {
            if (password.chars().count() as u64) < MIN_PASSWORD_LENGTH {
                errors.push(
                    "password",
                    format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH),
                );
            }
        }

        Ok(errors)
    }
}

/// Uniqueness and range rules for products
pub struct ProductRules {
    products: Arc<dyn ProductQueries>,
}

impl ProductRules {
    pub fn new(products: Arc<dyn ProductQueries>) -> Self {
        Self { products }
    }
}

#[async_trait]
impl ModelValidator<CreateProduct> for ProductRules {
    fn constraint(&self) -> ValidationConstraint {
        ValidationConstraint::ValidateIfThereAreNoPreviousErrors
    }

    async fn validate(&self, model: &CreateProduct) -> AppResult<ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.products.product_name_exists(&model.name).await? {
            errors.push(
                "name",
                format!("Product '{}' is already registered.", model.name),
            );
        }
        if model.unit_stock < 0 {
            errors.push("unit_stock", "Units in stock cannot be negative.");
        }
        if model.unit_price_cents < 0 {
            errors.push("unit_price_cents", "Unit price cannot be negative.");
        }

        Ok(errors)
    }
}

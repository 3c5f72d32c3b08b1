use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::model::problem::{Problem, number_field, text_field};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "id": 1,
        "name": "Asha Rao",
        "email": "asha.rao@company.com",
        "designation": "Accountant",
        "basicSalary": 42000.0,
        "allowances": 5000.0,
        "deductions": 1500.0
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Asha Rao")]
    pub name: String,

    #[schema(example = "asha.rao@company.com")]
    pub email: String,

    #[schema(example = "Accountant")]
    pub designation: String,

    #[schema(example = 42000.0)]
    pub basic_salary: f64,

    #[serde(default)]
    #[schema(example = 5000.0)]
    pub allowances: f64,

    #[serde(default)]
    #[schema(example = 1500.0)]
    pub deductions: f64,
}

/// A validated employee that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub designation: String,
    pub basic_salary: f64,
    pub allowances: f64,
    pub deductions: f64,
}

impl NewEmployee {
    /// Validates a loosely-typed JSON object, collecting every problem found.
    pub fn from_value(value: &Value) -> Result<Self, Vec<Problem>> {
        let Some(obj) = value.as_object() else {
            return Err(vec![Problem::NotAnObject]);
        };

        let mut problems = Vec::new();
        let name = text_field(obj, "name", &mut problems);
        let email = text_field(obj, "email", &mut problems);
        let designation = text_field(obj, "designation", &mut problems);

        let basic_salary = match number_field(obj, "basicSalary") {
            Ok(Some(n)) => Some(n),
            Ok(None) => {
                problems.push(Problem::Missing("basicSalary"));
                None
            }
            Err(p) => {
                problems.push(p);
                None
            }
        };

        let mut optional_amount = |key: &'static str| match number_field(obj, key) {
            Ok(n) => n.unwrap_or(0.0),
            Err(p) => {
                problems.push(p);
                0.0
            }
        };
        let allowances = optional_amount("allowances");
        let deductions = optional_amount("deductions");

        match (name, email, designation, basic_salary) {
            (Some(name), Some(email), Some(designation), Some(basic_salary))
                if problems.is_empty() =>
            {
                Ok(Self {
                    name,
                    email,
                    designation,
                    basic_salary,
                    allowances,
                    deductions,
                })
            }
            _ => Err(problems),
        }
    }

    pub fn with_id(self, id: u64) -> Employee {
        Employee {
            id,
            name: self.name,
            email: self.email,
            designation: self.designation,
            basic_salary: self.basic_salary,
            allowances: self.allowances,
            deductions: self.deductions,
        }
    }
}

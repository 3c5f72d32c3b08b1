use std::fmt::Write;

use serde::Serialize;
use utoipa::ToSchema;

use crate::model::employee::Employee;
use crate::payroll::aggregate::net_salary;

pub const SLIP_TITLE: &str = "Salary Slip";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SlipValue {
    Text(String),
    Amount(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SlipField {
    #[schema(value_type = String, example = "Net Salary")]
    pub label: &'static str,
    #[schema(value_type = Object, example = 1150.0)]
    pub value: SlipValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalarySlip {
    #[schema(value_type = String, example = "Salary Slip")]
    pub title: &'static str,
    #[schema(example = "Asha Rao_SalarySlip")]
    pub file_name: String,
    pub fields: Vec<SlipField>,
}

/// Employee name with control characters replaced, safe for a download file name.
fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_control() { '_' } else { c })
        .collect()
}

impl SalarySlip {
    pub fn for_employee(employee: &Employee) -> Self {
        let text = |label, value: &str| SlipField {
            label,
            value: SlipValue::Text(value.to_string()),
        };
        let amount = |label, value: f64| SlipField {
            label,
            value: SlipValue::Amount(value),
        };

        Self {
            title: SLIP_TITLE,
            file_name: format!("{}_SalarySlip", file_stem(&employee.name)),
            fields: vec![
                text("Name", &employee.name),
                text("Email", &employee.email),
                text("Designation", &employee.designation),
                amount("Basic Salary", employee.basic_salary),
                amount("Allowances", employee.allowances),
                amount("Deductions", employee.deductions),
                amount("Net Salary", net_salary(employee)),
            ],
        }
    }

    pub fn field(&self, label: &str) -> Option<&SlipValue> {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| &f.value)
    }

    pub fn net_salary(&self) -> Option<f64> {
        match self.field("Net Salary") {
            Some(SlipValue::Amount(v)) => Some(*v),
            _ => None,
        }
    }

    /// One `Label: value` line per field, amounts prefixed with `currency`.
    pub fn render_text(&self, currency: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.title);
        let _ = writeln!(out);
        for field in &self.fields {
            let _ = match &field.value {
                SlipValue::Text(v) => writeln!(out, "{}: {}", field.label, v),
                SlipValue::Amount(v) => writeln!(out, "{}: {}{}", field.label, currency, v),
            };
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee() -> Employee {
        Employee {
            id: 1,
            name: "A".into(),
            email: "a@company.com".into(),
            designation: "Clerk".into(),
            basic_salary: 1000.0,
            allowances: 200.0,
            deductions: 50.0,
        }
    }

    #[test]
    fn slip_carries_net_salary() {
        let slip = SalarySlip::for_employee(&employee());
        assert_eq!(slip.net_salary(), Some(1150.0));
    }

    #[test]
    fn fields_are_in_print_order() {
        let slip = SalarySlip::for_employee(&employee());
        let labels: Vec<_> = slip.fields.iter().map(|f| f.label).collect();
        assert_eq!(
            labels,
            vec![
                "Name",
                "Email",
                "Designation",
                "Basic Salary",
                "Allowances",
                "Deductions",
                "Net Salary"
            ]
        );
        assert_eq!(slip.file_name, "A_SalarySlip");
        assert_eq!(slip.field("Name"), Some(&SlipValue::Text("A".into())));
    }

    #[test]
    fn net_salary_with_zero_allowances_and_deductions() {
        let mut emp = employee();
        emp.allowances = 0.0;
        emp.deductions = 0.0;
        assert_eq!(SalarySlip::for_employee(&emp).net_salary(), Some(1000.0));
    }

    #[test]
    fn renders_plain_text() {
        let text = SalarySlip::for_employee(&employee()).render_text("₹");
        assert!(text.starts_with("Salary Slip\n"));
        assert!(text.contains("Designation: Clerk\n"));
        assert!(text.contains("Basic Salary: ₹1000\n"));
        assert!(text.ends_with("Net Salary: ₹1150\n"));
    }

    #[test]
    fn serializes_values_untagged() {
        let json = serde_json::to_value(SalarySlip::for_employee(&employee())).unwrap();
        assert_eq!(json["fileName"], "A_SalarySlip");
        assert_eq!(json["fields"][6]["label"], "Net Salary");
        assert_eq!(json["fields"][6]["value"], 1150.0);
        assert_eq!(json["fields"][0]["value"], "A");
    }

    #[test]
    fn file_name_drops_control_characters() {
        let mut emp = employee();
        emp.name = "Ann\nLee\t".into();
        let slip = SalarySlip::for_employee(&emp);
        assert_eq!(slip.file_name, "Ann_Lee__SalarySlip");
        assert_eq!(slip.field("Name"), Some(&SlipValue::Text("Ann\nLee\t".into())));
    }
}

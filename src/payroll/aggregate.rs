use chrono::NaiveDate;
use serde::Serialize;
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

use crate::model::{
    attendance::{AttendanceRecord, AttendanceStatus},
    employee::Employee,
};
use crate::payroll::calendar::{CalendarDay, is_same_day, on_day};

/// basic + allowances - deductions
pub fn net_salary(employee: &Employee) -> f64 {
    employee.basic_salary + employee.allowances - employee.deductions
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayrollSummary {
    #[schema(example = 151500.0)]
    pub total: f64,
    #[schema(example = 62000.0)]
    pub highest: f64,
    #[schema(example = 18000.0)]
    pub lowest: f64,
}

/// Total, highest and lowest net salary. All zero for an empty roster.
pub fn payroll_summary(employees: &[Employee]) -> PayrollSummary {
    let mut nets: Vec<f64> = employees.iter().map(net_salary).collect();
    // canonical order so the float sum does not depend on fetch order
    nets.sort_by(f64::total_cmp);

    match (nets.first(), nets.last()) {
        (Some(&lowest), Some(&highest)) => PayrollSummary {
            total: nets.iter().sum(),
            highest,
            lowest,
        },
        _ => PayrollSummary::default(),
    }
}

/// Most recent attendance day, `None` when there are no records.
pub fn latest_date(records: &[AttendanceRecord]) -> Option<NaiveDate> {
    records.iter().map(|r| r.date).max()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct DailyCounts {
    pub present: usize,
    pub absent: usize,
    pub leave: usize,
}

impl DailyCounts {
    fn record(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Absent => self.absent += 1,
            AttendanceStatus::Leave => self.leave += 1,
        }
    }

    #[cfg(test)]
    pub fn get(&self, status: AttendanceStatus) -> usize {
        match status {
            AttendanceStatus::Present => self.present,
            AttendanceStatus::Absent => self.absent,
            AttendanceStatus::Leave => self.leave,
        }
    }

    pub fn total(&self) -> usize {
        self.present + self.absent + self.leave
    }
}

/// Per-status counts of the records on `day`.
pub fn daily_counts(records: &[AttendanceRecord], day: &impl CalendarDay) -> DailyCounts {
    records
        .iter()
        .filter(|r| is_same_day(*r, day))
        .fold(DailyCounts::default(), |mut counts, r| {
            counts.record(r.status);
            counts
        })
}

/// Which day the dashboard treats as "today".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ReferenceDay {
    /// The most recent day present in the attendance data.
    #[default]
    Latest,
    /// The wall-clock date.
    Today,
}

impl ReferenceDay {
    pub fn resolve(self, records: &[AttendanceRecord], today: NaiveDate) -> Option<NaiveDate> {
        match self {
            ReferenceDay::Latest => latest_date(records),
            ReferenceDay::Today => Some(today),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[schema(example = 12)]
    pub total_employees: usize,
    #[schema(example = "2024-01-03", value_type = Option<String>, format = "date")]
    pub latest_date: Option<NaiveDate>,
    /// Day the daily counts refer to.
    #[schema(example = "2024-01-03", value_type = Option<String>, format = "date")]
    pub reference_date: Option<NaiveDate>,
    pub today: DailyCounts,
    pub payroll: PayrollSummary,
    pub todays_attendance: Vec<AttendanceRecord>,
}

impl DashboardStats {
    pub fn compute(
        employees: &[Employee],
        attendance: &[AttendanceRecord],
        reference_date: Option<NaiveDate>,
    ) -> Self {
        let (today, todays_attendance) = match reference_date {
            Some(day) => (daily_counts(attendance, &day), on_day(attendance, &day)),
            None => (DailyCounts::default(), Vec::new()),
        };

        Self {
            total_employees: employees.len(),
            latest_date: latest_date(attendance),
            reference_date,
            today,
            payroll: payroll_summary(employees),
            todays_attendance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayrollRow {
    pub id: u64,
    pub name: String,
    pub net_salary: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PayrollOverview {
    pub summary: PayrollSummary,
    pub rows: Vec<PayrollRow>,
}

impl PayrollOverview {
    pub fn compute(employees: &[Employee]) -> Self {
        Self {
            summary: payroll_summary(employees),
            rows: employees
                .iter()
                .map(|e| PayrollRow {
                    id: e.id,
                    name: e.name.clone(),
                    net_salary: net_salary(e),
                })
                .collect(),
        }
    }
}

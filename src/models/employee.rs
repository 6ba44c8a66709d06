//! Employee identities and per-employee attendance summaries.

/// An employee derived from attendance rows. `emp_code` is the identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    pub emp_code: String,
    pub name: String,
}

impl Employee {
    /// Case-insensitive match against code or name.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.emp_code.to_lowercase().contains(&query) || self.name.to_lowercase().contains(&query)
    }
}

/// Attendance of one employee over a week or month.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeSummary {
    pub emp_code: String,
    pub name: String,
    pub total_days: u32,
    pub present_days: u32,
    pub leave_days: u32,
    /// Sum of work hours on present days, rounded to tenths.
    pub total_hours: f64,
    pub ontime_days: u32,
    pub late_days: u32,
    /// Present days as a percentage of total days, rounded to tenths.
    pub attendance_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_employee_matches() {
        let emp = Employee {
            emp_code: "E042".to_string(),
            name: "Nguyen Van An".to_string(),
        };
        assert!(emp.matches(""));
        assert!(emp.matches("e04"));
        assert!(emp.matches("van an"));
        assert!(!emp.matches("E043"));
    }
}

// Organisation schemas - a department and its employees reference each other

use crate::ent_framework::{EdgeDefinition, EntSchema, FieldDefinition, FieldType};

pub struct DepartmentSchema;

impl EntSchema for DepartmentSchema {
    fn name() -> &'static str {
        "Department"
    }

    fn fields() -> Vec<FieldDefinition> {
        vec![FieldDefinition::new("name", FieldType::String).unique()]
    }

    fn edges() -> Vec<EdgeDefinition> {
        vec![
            // Mutual with Employee.department
            EdgeDefinition::from("head", "Employee", "headed_department"),
            EdgeDefinition::to("employees", "Employee"),
        ]
    }
}

pub struct EmployeeSchema;

impl EntSchema for EmployeeSchema {
    fn name() -> &'static str {
        "Employee"
    }

    fn fields() -> Vec<FieldDefinition> {
        vec![
            FieldDefinition::new("name", FieldType::String),
            FieldDefinition::new("email", FieldType::String).unique(),
            FieldDefinition::new("badge", FieldType::UUID).storage_key("badge_uuid"),
        ]
    }

    fn edges() -> Vec<EdgeDefinition> {
        vec![
            EdgeDefinition::from("department", "Department", "employees").required(),
            EdgeDefinition::from("manager", "Employee", "reports"),
            EdgeDefinition::to("reports", "Employee"),
            EdgeDefinition::to("headed_department", "Department").unique(),
        ]
    }
}

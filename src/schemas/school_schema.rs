// School schemas - students and courses linked through an implicit join table

use crate::ent_framework::{EdgeDefinition, EntSchema, FieldDefault, FieldDefinition, FieldType};

pub struct StudentSchema;

impl EntSchema for StudentSchema {
    fn name() -> &'static str {
        "Student"
    }

    fn fields() -> Vec<FieldDefinition> {
        vec![
            FieldDefinition::new("fullName", FieldType::String),
            FieldDefinition::new("studentNumber", FieldType::String).unique().size(16),
            FieldDefinition::new("enrolledAt", FieldType::Time)
                .default_value(FieldDefault::Function("now".to_string())),
        ]
    }

    fn edges() -> Vec<EdgeDefinition> {
        vec![EdgeDefinition::to("courses", "Course")
            .through("enrollments")
            .inverse("students")]
    }
}

pub struct CourseSchema;

impl EntSchema for CourseSchema {
    fn name() -> &'static str {
        "Course"
    }

    fn fields() -> Vec<FieldDefinition> {
        vec![
            FieldDefinition::new("code", FieldType::String).unique().size(12),
            FieldDefinition::new("title", FieldType::String),
            FieldDefinition::new("credits", FieldType::Int).default_value(FieldDefault::Int(5)),
        ]
    }

    fn edges() -> Vec<EdgeDefinition> {
        vec![EdgeDefinition::to("students", "Student")
            .through("enrollments")
            .inverse("courses")]
    }
}

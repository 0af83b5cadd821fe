// Shop schemas - customers, orders and the catalogue they reference
// Category is self-referencing; Order -> Customer is a plain belongs-to chain

use crate::ent_framework::{
    AnnotationDefinition, EdgeDefinition, EntSchema, FieldDefault, FieldDefinition, FieldType,
    TABLE_NAME_ANNOTATION,
};

pub struct CustomerSchema;

impl EntSchema for CustomerSchema {
    fn name() -> &'static str {
        "Customer"
    }

    fn fields() -> Vec<FieldDefinition> {
        vec![
            FieldDefinition::new("name", FieldType::String).size(128),
            FieldDefinition::new("email", FieldType::String)
                .unique()
                .size(255)
                .annotate("index", "idx_customer_email"),
            FieldDefinition::new("phone", FieldType::String).optional(),
            FieldDefinition::new("createdAt", FieldType::Time)
                .default_value(FieldDefault::Function("now".to_string())),
        ]
    }

    fn edges() -> Vec<EdgeDefinition> {
        vec![EdgeDefinition::to("orders", "Order")]
    }
}

pub struct OrderSchema;

impl EntSchema for OrderSchema {
    fn name() -> &'static str {
        "Order"
    }

    fn fields() -> Vec<FieldDefinition> {
        vec![
            FieldDefinition::new("total", FieldType::Float).default_value(FieldDefault::Float(0.0)),
            FieldDefinition::new(
                "status",
                FieldType::Enum(vec![
                    "pending".to_string(),
                    "paid".to_string(),
                    "shipped".to_string(),
                ]),
            )
            .default_value(FieldDefault::String("pending".to_string())),
            FieldDefinition::new("placedAt", FieldType::Time)
                .default_value(FieldDefault::Function("now".to_string())),
            // Computed on read, never stored
            FieldDefinition::new("displayTotal", FieldType::String).skip_migration(),
        ]
    }

    fn edges() -> Vec<EdgeDefinition> {
        vec![
            EdgeDefinition::from("customer", "Customer", "orders").required(),
            EdgeDefinition::to("items", "OrderItem"),
        ]
    }
}

pub struct OrderItemSchema;

impl EntSchema for OrderItemSchema {
    fn name() -> &'static str {
        "OrderItem"
    }

    fn fields() -> Vec<FieldDefinition> {
        vec![
            FieldDefinition::new("quantity", FieldType::Int).default_value(FieldDefault::Int(1)),
            FieldDefinition::new("unitPrice", FieldType::Float),
        ]
    }

    fn edges() -> Vec<EdgeDefinition> {
        vec![
            EdgeDefinition::from("order", "Order", "items").required(),
            EdgeDefinition::from("product", "Product", "order_items").required(),
        ]
    }
}

pub struct ProductSchema;

impl EntSchema for ProductSchema {
    fn name() -> &'static str {
        "Product"
    }

    fn fields() -> Vec<FieldDefinition> {
        vec![
            FieldDefinition::new("sku", FieldType::String)
                .unique()
                .size(32)
                .comment("stock keeping unit"),
            FieldDefinition::new("title", FieldType::String),
            FieldDefinition::new("price", FieldType::Float),
            FieldDefinition::new("attributes", FieldType::JSON).optional(),
        ]
    }

    fn edges() -> Vec<EdgeDefinition> {
        vec![
            EdgeDefinition::from("category", "Category", "products"),
            EdgeDefinition::to("order_items", "OrderItem"),
        ]
    }

    fn annotations() -> Vec<AnnotationDefinition> {
        vec![AnnotationDefinition::new(TABLE_NAME_ANNOTATION, "catalogue")]
    }
}

pub struct CategorySchema;

impl EntSchema for CategorySchema {
    fn name() -> &'static str {
        "Category"
    }

    fn fields() -> Vec<FieldDefinition> {
        vec![FieldDefinition::new("name", FieldType::String).unique()]
    }

    fn edges() -> Vec<EdgeDefinition> {
        vec![
            EdgeDefinition::from("parent", "Category", "children"),
            EdgeDefinition::to("children", "Category"),
            EdgeDefinition::to("products", "Product"),
        ]
    }
}

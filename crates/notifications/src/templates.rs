//! HTML email templates for product events.
//!
//! Bodies are rendered with Handlebars, which HTML-escapes every `{{value}}`.
//! Subjects are plain text and are not escaped.

use common::ProductId;
use domain::Product;
use handlebars::Handlebars;
use serde_json::{Value, json};

use crate::error::NotificationError;

/// Subject and HTML body of a notification email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub subject: String,
    pub html_body: String,
}

macro_rules! product_details {
    () => {
        "<ul>\
         <li><strong>ID:</strong> {{id}}</li>\
         <li><strong>Name:</strong> {{name}}</li>\
         <li><strong>Description:</strong> {{description}}</li>\
         <li><strong>Price:</strong> {{price}}</li>\
         <li><strong>Stock:</strong> {{stock}}</li>\
         </ul>"
    };
}

const PRODUCT_CREATED: &str = concat!(
    "<h1>New product created</h1>",
    product_details!(),
    "<h2>Variants</h2>",
    "{{#if variants}}\
     <table><tr><th>Size</th><th>Color</th><th>Price</th><th>Stock</th><th>Image</th></tr>\
     {{#each variants}}\
     <tr><td>{{size}}</td><td>{{color}}</td><td>{{price}}</td><td>{{stock}}</td><td>{{image_url}}</td></tr>\
     {{/each}}\
     </table>\
     {{else}}<p>No variants.</p>{{/if}}",
);

const PRODUCT_UPDATED: &str = concat!("<h1>Product updated</h1>", product_details!());

const PRODUCT_DELETED: &str = "<h1>Product deleted</h1>\
    <p>The product with ID <strong>{{id}}</strong> has been deleted.</p>";

/// Renders notification emails.
pub struct EmailTemplates {
    registry: Handlebars<'static>,
}

impl Default for EmailTemplates {
    fn default() -> Self {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        Self { registry }
    }
}

impl EmailTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Email announcing a new product, listing its variants.
    pub fn product_created(&self, product: &Product) -> Result<EmailMessage, NotificationError> {
        Ok(EmailMessage {
            subject: format!("New product created: {}", product.name()),
            html_body: self.render("product_created", PRODUCT_CREATED, &product_context(product))?,
        })
    }

    /// Email announcing a product update.
    pub fn product_updated(&self, product: &Product) -> Result<EmailMessage, NotificationError> {
        Ok(EmailMessage {
            subject: format!("Product updated: {}", product.name()),
            html_body: self.render("product_updated", PRODUCT_UPDATED, &product_context(product))?,
        })
    }

    /// Email announcing a deletion. Only the id is known at this point.
    pub fn product_deleted(
        &self,
        product_id: &ProductId,
    ) -> Result<EmailMessage, NotificationError> {
        Ok(EmailMessage {
            subject: "Product deleted".to_string(),
            html_body: self.render(
                "product_deleted",
                PRODUCT_DELETED,
                &json!({ "id": product_id.as_str() }),
            )?,
        })
    }

    fn render(
        &self,
        name: &'static str,
        source: &str,
        context: &Value,
    ) -> Result<String, NotificationError> {
        self.registry
            .render_template(source, context)
            .map_err(|e| NotificationError::Template {
                template: name,
                reason: e.to_string(),
            })
    }
}

fn product_context(product: &Product) -> Value {
    let variants: Vec<Value> = product
        .variants()
        .iter()
        .map(|variant| {
            json!({
                "size": variant.size(),
                "color": variant.color(),
                "price": variant.price().to_string(),
                "stock": variant.stock().value(),
                "image_url": variant.image_url(),
            })
        })
        .collect();

    json!({
        "id": product.id().as_str(),
        "name": product.name().value(),
        "description": product.description(),
        "price": product.price().to_string(),
        "stock": product.stock().value(),
        "variants": variants,
    })
}

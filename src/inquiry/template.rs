//! Owner notification email

use std::fmt::Write;
use uuid::Uuid;

use super::models::ValidInquiry;
use crate::products::diamond::fields;
use crate::products::payload::escape_html;

const DIAMOND_ROWS: [(&str, &str); 9] = [
    ("Stock #", fields::STOCK_NUM),
    ("Shape", fields::SHAPE),
    ("Carat", fields::SIZE),
    ("Color", fields::COLOR),
    ("Clarity", fields::CLARITY),
    ("Cut", fields::CUT),
    ("Lab", fields::LAB),
    ("Certificate", fields::CERT_NUM),
    ("Price", fields::PRICE),
];

pub fn subject(inquiry: &ValidInquiry) -> String {
    format!("Diamond inquiry from {}: {}", inquiry.name, inquiry.diamond.display_name())
}

pub fn render(inquiry: &ValidInquiry, id: Uuid) -> String {
    let mut html = String::from("<h2>New diamond inquiry</h2>\n");
    let _ = writeln!(html, "<p>Reference: {id}</p>");

    html.push_str("<h3>Customer</h3>\n<ul>\n");
    for (label, value) in [
        ("Name", &inquiry.name),
        ("Email", &inquiry.email),
        ("Phone", &inquiry.phone),
    ] {
        let _ = writeln!(html, "<li><strong>{label}:</strong> {}</li>", escape_html(value));
    }
    html.push_str("</ul>\n<h3>Diamond</h3>\n<ul>\n");

    for (label, key) in DIAMOND_ROWS {
        if let Some(value) = inquiry.diamond.text(key) {
            let _ = writeln!(html, "<li><strong>{label}:</strong> {}</li>", escape_html(&value));
        }
    }
    html.push_str("</ul>\n");

    let _ = writeln!(html, "<p><strong>Quantity:</strong> {}</p>", inquiry.quantity);
    if let Some(total) = &inquiry.total_price {
        let _ = writeln!(html, "<p><strong>Total:</strong> {}</p>", escape_html(total));
    }
    if let Some(message) = &inquiry.message {
        let _ = writeln!(
            html,
            "<h3>Message</h3>\n<p>{}</p>",
            escape_html(message).replace('\n', "<br>")
        );
    }

    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::products::DiamondRecord;
    use serde_json::json;

    fn inquiry() -> ValidInquiry {
        ValidInquiry {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-0100".to_string(),
            diamond: DiamondRecord::from_value(json!({
                "stock_num": "RG-1", "shape": "Round", "size": 1.01, "lab": "GIA"
            }))
            .unwrap(),
            quantity: 1,
            total_price: Some("$6,200.00".to_string()),
            message: Some("Is it <still> available?\nThanks".to_string()),
        }
    }

    #[test]
    fn test_subject_names_customer_and_stone() {
        assert_eq!(
            subject(&inquiry()),
            "Diamond inquiry from Ada: GIA 1.01 Carat -  Cut Round Diamond"
        );
    }

    #[test]
    fn test_body_contents() {
        let id = Uuid::nil();
        let html = render(&inquiry(), id);

        assert!(html.contains("Reference: 00000000-0000-0000-0000-000000000000"));
        assert!(html.contains("<li><strong>Phone:</strong> 555-0100</li>"));
        assert!(html.contains("<li><strong>Stock #:</strong> RG-1</li>"));
        assert!(!html.contains("Clarity"));
        assert!(html.contains("<p><strong>Total:</strong> $6,200.00</p>"));
        assert!(html.contains("Is it &lt;still&gt; available?<br>Thanks"));
    }
}

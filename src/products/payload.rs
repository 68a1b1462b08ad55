//! Shopify product payload built from a diamond record

use serde::Serialize;
use serde_json::{Value, json};
use std::fmt::Write;

use super::diamond::{DiamondRecord, fields};

const DEFAULT_VENDOR: &str = "Diamond Vendor";
const PRODUCT_TYPE: &str = "Diamond";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductPayload {
    pub product: NewProduct,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewProduct {
    pub title: String,
    pub body_html: String,
    pub vendor: String,
    pub product_type: String,
    pub tags: String,
    pub variants: Vec<NewVariant>,
    pub images: Vec<NewImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewVariant {
    pub price: String,
    pub sku: String,
    /// `null` leaves vendor stock untracked
    pub inventory_management: Option<String>,
    pub inventory_policy: String,
    pub weight: Value,
    pub weight_unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewImage {
    pub src: String,
}

impl ProductPayload {
    pub fn from_diamond(diamond: &DiamondRecord, sku: &str) -> Self {
        let tags = std::iter::once(PRODUCT_TYPE.to_string())
            .chain(
                [fields::SHAPE, fields::LAB, fields::COLOR, fields::CLARITY]
                    .into_iter()
                    .filter_map(|key| diamond.text(key)),
            )
            .collect::<Vec<_>>()
            .join(", ");

        let variant = NewVariant {
            price: diamond.price(),
            sku: sku.to_string(),
            inventory_management: None,
            inventory_policy: "continue".to_string(),
            weight: diamond.get(fields::SIZE).cloned().unwrap_or_else(|| json!(0)),
            weight_unit: "ct".to_string(),
        };

        let images = diamond
            .text(fields::IMAGE_FILE)
            .map(|src| vec![NewImage { src }])
            .unwrap_or_default();

        ProductPayload {
            product: NewProduct {
                title: diamond.display_name(),
                body_html: describe(diamond),
                vendor: diamond
                    .text(fields::LAB)
                    .unwrap_or_else(|| DEFAULT_VENDOR.to_string()),
                product_type: PRODUCT_TYPE.to_string(),
                tags,
                variants: vec![variant],
                images,
            },
        }
    }
}

/// HTML product description listing every present grading field
pub fn describe(diamond: &DiamondRecord) -> String {
    const SPEC_ROWS: [(&str, &str); 10] = [
        ("Shape", fields::SHAPE),
        ("Carat", fields::SIZE),
        ("Color", fields::COLOR),
        ("Clarity", fields::CLARITY),
        ("Cut", fields::CUT),
        ("Polish", fields::POLISH),
        ("Symmetry", fields::SYMMETRY),
        ("Fluorescence", fields::FLUOR_INTENSITY),
        ("Lab", fields::LAB),
        ("Certificate", fields::CERT_NUM),
    ];

    let mut html = String::from("<h3>Diamond Specifications</h3>\n<ul>\n");
    for (label, key) in SPEC_ROWS {
        if let Some(value) = diamond.text(key) {
            let _ = writeln!(html, "<li><strong>{}:</strong> {}</li>", label, escape_html(&value));
        }
    }
    html.push_str("</ul>\n");

    if let (Some(length), Some(width), Some(depth)) = (
        diamond.text(fields::MEAS_LENGTH),
        diamond.text(fields::MEAS_WIDTH),
        diamond.text(fields::MEAS_DEPTH),
    ) {
        let _ = writeln!(
            html,
            "<h3>Measurements</h3>\n<p>{} x {} x {} mm</p>",
            escape_html(&length),
            escape_html(&width),
            escape_html(&depth)
        );
    }

    for (label, key) in [("Depth", fields::DEPTH_PERCENT), ("Table", fields::TABLE_PERCENT)] {
        if let Some(value) = diamond.text(key) {
            let _ = writeln!(html, "<p><strong>{}:</strong> {}%</p>", label, escape_html(&value));
        }
    }

    html
}

pub(crate) fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_gia() -> DiamondRecord {
        DiamondRecord::from_value(json!({
            "diamond_id": 120044,
            "stock_num": "RG-1",
            "shape": "Round",
            "size": 1.01,
            "color": "G",
            "clarity": "VS1",
            "cut": "Excellent",
            "polish": "Excellent",
            "symmetry": "Very Good",
            "lab": "GIA",
            "cert_num": "2141438171",
            "meas_length": 6.43,
            "meas_width": 6.47,
            "meas_depth": 3.98,
            "depth_percent": 61.7,
            "total_sales_price": 6200,
            "image_file": "https://img.example.com/120044.jpg"
        }))
        .unwrap()
    }

    #[test]
    fn test_payload_from_full_record() {
        let payload = ProductPayload::from_diamond(&round_gia(), "RG-1");
        let product = &payload.product;

        assert_eq!(product.title, "GIA 1.01 Carat G-VS1 Excellent Cut Round Diamond");
        assert_eq!(product.vendor, "GIA");
        assert_eq!(product.product_type, "Diamond");
        assert_eq!(product.tags, "Diamond, Round, GIA, G, VS1");
        assert_eq!(product.variants.len(), 1);
        assert_eq!(product.variants[0].sku, "RG-1");
        assert_eq!(product.variants[0].price, "6200");
        assert_eq!(product.variants[0].weight, json!(1.01));
        assert_eq!(product.images, vec![NewImage { src: "https://img.example.com/120044.jpg".to_string() }]);
    }

    #[test]
    fn test_payload_wire_shape_keeps_null_inventory_management() {
        let payload = ProductPayload::from_diamond(&round_gia(), "RG-1");
        let value = serde_json::to_value(&payload).unwrap();

        assert!(value["product"]["variants"][0]["inventory_management"].is_null());
        assert_eq!(value["product"]["variants"][0]["inventory_policy"], "continue");
        assert_eq!(value["product"]["variants"][0]["weight_unit"], "ct");
    }

    #[test]
    fn test_sparse_record_defaults() {
        let diamond = DiamondRecord::from_value(json!({"diamond_id": 7})).unwrap();
        let payload = ProductPayload::from_diamond(&diamond, "7");

        assert_eq!(payload.product.vendor, "Diamond Vendor");
        assert_eq!(payload.product.tags, "Diamond");
        assert_eq!(payload.product.variants[0].weight, json!(0));
        assert!(payload.product.images.is_empty());
    }

    #[test]
    fn test_description_lists_present_fields_only() {
        let html = describe(&round_gia());

        assert!(html.contains("<li><strong>Shape:</strong> Round</li>"));
        assert!(html.contains("<li><strong>Certificate:</strong> 2141438171</li>"));
        assert!(html.contains("<p>6.43 x 6.47 x 3.98 mm</p>"));
        assert!(html.contains("<p><strong>Depth:</strong> 61.7%</p>"));
        assert!(!html.contains("Fluorescence"));
        assert!(!html.contains("Table:"));
    }

    #[test]
    fn test_measurements_need_all_three_dimensions() {
        let diamond =
            DiamondRecord::from_value(json!({"meas_length": 6.4, "meas_width": 6.5})).unwrap();
        assert!(!describe(&diamond).contains("Measurements"));
    }

    #[test]
    fn test_description_escapes_markup() {
        let diamond = DiamondRecord::from_value(json!({"shape": "<script>x</script>"})).unwrap();
        let html = describe(&diamond);

        assert!(html.contains("&lt;script&gt;x&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
    }
}

//! Server-side HTML rendering.
//!
//! Templates are compiled into the binary and rendered with minijinja. Templates named `*.html`
//! are auto-escaped, so product names and descriptions are always inserted as text.
//!
//! Three things are rendered: the full page shell (`home.html`), and the two fragments returned
//! by the listing endpoint: the product table and the pagination bar.

use minijinja::{Environment, context};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::api::models::pagination::Page;
use crate::db::models::products::Product;
use crate::types::ProductId;

/// Characters of description shown in the table before truncating
pub const DESCRIPTION_PREVIEW_CHARS: usize = 50;

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../templates/layout.html")),
    ("home.html", include_str!("../templates/home.html")),
    ("products/table.html", include_str!("../templates/products/table.html")),
    ("products/pagination.html", include_str!("../templates/products/pagination.html")),
];

/// Cut `text` to at most `limit` characters, trimming trailing whitespace and appending `...`
/// when anything was removed.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}...", text[..cut].trim_end()),
    }
}

/// Format a price with two decimals, thousands separators and a currency symbol, e.g.
/// `1,234.50 ₽`.
pub fn format_price(price: Decimal, currency_symbol: &str) -> String {
    let fixed = format!(
        "{:.2}",
        price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    );
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if currency_symbol.is_empty() {
        format!("{sign}{grouped}.{fraction}")
    } else {
        format!("{sign}{grouped}.{fraction} {currency_symbol}")
    }
}

#[derive(Debug, Serialize)]
struct ProductRow<'a> {
    id: ProductId,
    name: &'a str,
    description: String,
    price: String,
    quantity: i32,
}

#[derive(Debug, Serialize)]
struct PageLink {
    number: i64,
    active: bool,
}

pub struct Views {
    env: Environment<'static>,
    currency_symbol: String,
}

impl Views {
    pub fn new(currency_symbol: impl Into<String>) -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self {
            env,
            currency_symbol: currency_symbol.into(),
        })
    }

    /// The full page: layout, product modal and client script
    pub fn render_home(&self) -> Result<String, minijinja::Error> {
        self.env
            .get_template("home.html")?
            .render(context! { title => "Products" })
    }

    /// Table rows for a page of products, or a notice when the page is empty
    pub fn render_table(&self, page: &Page<Product>) -> Result<String, minijinja::Error> {
        let rows: Vec<ProductRow<'_>> = page
            .items
            .iter()
            .map(|product| ProductRow {
                id: product.id,
                name: &product.name,
                description: product
                    .description
                    .as_deref()
                    .map(|d| truncate_chars(d, DESCRIPTION_PREVIEW_CHARS))
                    .unwrap_or_default(),
                price: format_price(product.price, &self.currency_symbol),
                quantity: product.quantity,
            })
            .collect();

        self.env
            .get_template("products/table.html")?
            .render(context! { products => rows })
    }

    /// Page navigation, or an empty string when everything fits on one page
    pub fn render_pagination<T>(&self, page: &Page<T>) -> Result<String, minijinja::Error> {
        if !page.has_pages() {
            return Ok(String::new());
        }

        let links: Vec<PageLink> = (1..=page.last_page())
            .map(|number| PageLink {
                number,
                active: number == page.current_page,
            })
            .collect();
        let previous = (!page.on_first_page()).then(|| page.current_page - 1);
        let next = page.has_more_pages().then(|| page.current_page + 1);

        self.env
            .get_template("products/pagination.html")?
            .render(context! { links, previous, next })
    }
}

use std::env;

use reqwest::Method;
use serde_json::Value;
use tracing::{debug, warn};

use shared_config::AppConfig;
use shared_database::SupabaseClient;

use crate::models::{Brand, Contact, Hero, Review, ServiceOffering, SiteConfig, Theme};

/// Loads the tenant configuration: env-driven defaults, with a remote
/// `businesses` row overriding them when one exists for the slug.
pub struct SiteService {
    supabase: SupabaseClient,
    slug: String,
    salon_name: String,
    salon_address: String,
    from_email: String,
}

impl SiteService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            slug: config.site_slug.clone(),
            salon_name: config.salon_name.clone(),
            salon_address: config.salon_address.clone(),
            from_email: config.from_email.clone(),
        }
    }

    /// The site as the public pages should see it. A missing `businesses`
    /// row or a lookup failure falls back to the env-derived site; the
    /// marketing pages must never 500 because the tenant table is down.
    pub async fn load_site(&self) -> SiteConfig {
        let mut site = self.site_from_env();

        match self.fetch_business_row().await {
            Ok(Some(row)) => {
                debug!("Applying businesses row for slug {}", self.slug);
                apply_business_row(&mut site, &row);
            }
            Ok(None) => debug!("No businesses row for slug {}", self.slug),
            Err(e) => warn!("businesses lookup failed, using env site: {}", e),
        }

        site
    }

    async fn fetch_business_row(&self) -> anyhow::Result<Option<Value>> {
        let path = format!(
            "/rest/v1/businesses?slug=eq.{}&limit=1",
            urlencoding::encode(&self.slug)
        );
        let rows: Vec<Value> = self.supabase.request(Method::GET, &path, None).await?;
        Ok(rows.into_iter().next())
    }

    fn site_from_env(&self) -> SiteConfig {
        let hero_images = env::var("HERO_IMAGES")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        let badges = env::var("BOOK_BADGES")
            .unwrap_or_else(|_| "Tue–Sat|North Wales, PA|Healthy hair first".to_string())
            .split('|')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        SiteConfig {
            slug: self.slug.clone(),
            brand: Brand {
                name: self.salon_name.clone(),
                tagline: env::var("TAGLINE")
                    .unwrap_or_else(|_| "Where Style Meets Simplicity".to_string()),
            },
            theme: Theme {
                gradient_start: env::var("GRADIENT_START")
                    .unwrap_or_else(|_| "#ff9966".to_string()),
                gradient_end: env::var("GRADIENT_END").unwrap_or_else(|_| "#66cccc".to_string()),
            },
            hero: Hero {
                cta_text: env::var("CTA_TEXT").unwrap_or_else(|_| "Book Now".to_string()),
                cta_url: env::var("CTA_URL").unwrap_or_else(|_| "/book".to_string()),
                subtext: env::var("HERO_SUBTEXT").unwrap_or_else(|_| {
                    "Color, cuts, and styling done with care—and on your schedule.".to_string()
                }),
                images: hero_images,
            },
            services: Vec::new(),
            reviews: Vec::new(),
            contact: Contact {
                address: self.salon_address.clone(),
                phone: env::var("SALON_PHONE").unwrap_or_default(),
                email: env::var("SALON_EMAIL").unwrap_or_else(|_| self.from_email.clone()),
                map_embed: env::var("MAP_EMBED").unwrap_or_default(),
            },
            badges,
        }
    }
}

/// Overlay non-null columns of a `businesses` row onto the env site.
fn apply_business_row(site: &mut SiteConfig, row: &Value) {
    override_string(row, "name", &mut site.brand.name);
    override_string(row, "tagline", &mut site.brand.tagline);
    override_string(row, "gradient_start", &mut site.theme.gradient_start);
    override_string(row, "gradient_end", &mut site.theme.gradient_end);
    override_string(row, "cta_text", &mut site.hero.cta_text);
    override_string(row, "cta_url", &mut site.hero.cta_url);
    override_string(row, "hero_subtext", &mut site.hero.subtext);
    override_string(row, "address", &mut site.contact.address);
    override_string(row, "phone", &mut site.contact.phone);
    override_string(row, "email", &mut site.contact.email);
    override_string(row, "map_embed", &mut site.contact.map_embed);

    if let Some(images) = string_list(row.get("hero_images")) {
        site.hero.images = images;
    }
    if let Some(badges) = string_list(row.get("badges")) {
        site.badges = badges;
    }
    if let Some(services) = typed_list::<ServiceOffering>(row.get("services")) {
        site.services = services;
    }
    if let Some(reviews) = typed_list::<Review>(row.get("reviews")) {
        site.reviews = reviews;
    }
}

fn override_string(row: &Value, key: &str, target: &mut String) {
    if let Some(value) = row.get(key).and_then(Value::as_str) {
        if !value.trim().is_empty() {
            *target = value.to_string();
        }
    }
}

fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    let items = value?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect(),
    )
}

fn typed_list<T: serde::de::DeserializeOwned>(value: Option<&Value>) -> Option<Vec<T>> {
    serde_json::from_value(value?.clone()).ok()
}

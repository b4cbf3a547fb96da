use serde::{Deserialize, Serialize};

/// Everything the public pages need to render one tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub slug: String,
    pub brand: Brand,
    pub theme: Theme,
    pub hero: Hero,
    pub services: Vec<ServiceOffering>,
    pub reviews: Vec<Review>,
    pub contact: Contact,
    pub badges: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brand {
    pub name: String,
    pub tagline: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub gradient_start: String,
    pub gradient_end: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hero {
    pub cta_text: String,
    pub cta_url: String,
    pub subtext: String,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceOffering {
    pub name: String,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub author: String,
    pub quote: String,
    #[serde(default)]
    pub rating: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub address: String,
    pub phone: String,
    pub email: String,
    pub map_embed: String,
}

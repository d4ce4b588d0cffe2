//! Built-in data served by the mocked sources: the demo catalog, the
//! recommendation sets, purchase history and the chat-session index.

use baiyit_core::{AcquisitionId, OrderStatus, Price, ProductId, SessionId};
use chrono::{DateTime, Utc};

use crate::models::{Acquisition, AcquisitionItem, Product, SessionSummary};

const RECOMMENDATION_IMAGE: &str = "/placeholder.svg?height=400&width=400";
const HISTORY_IMAGE: &str = "/placeholder.svg?height=100&width=100";

/// Compile-time description of a product.
struct Listing {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    cents: i64,
    original_cents: Option<i64>,
    discount: Option<f64>,
    image: &'static str,
    rating: f64,
    featured: Option<bool>,
    category: Option<&'static str>,
    specs: &'static [&'static str],
}

impl Listing {
    const BASE: Self = Self {
        id: "",
        title: "",
        description: "",
        cents: 0,
        original_cents: None,
        discount: None,
        image: RECOMMENDATION_IMAGE,
        rating: 0.0,
        featured: None,
        category: None,
        specs: &[],
    };

    fn to_product(&self) -> Product {
        Product {
            id: ProductId::new(self.id),
            title: self.title.to_string(),
            description: self.description.to_string(),
            price: Price::from_cents(self.cents),
            discount_price: None,
            original_price: self.original_cents.map(Price::from_cents),
            discount: self.discount,
            image: self.image.to_string(),
            rating: self.rating,
            category: self.category.map(String::from),
            featured: self.featured,
            specs: Some(self.specs.iter().map(|s| (*s).to_string()).collect()),
            created_at: None,
            updated_at: None,
        }
    }
}

fn products(listings: &[Listing]) -> Vec<Product> {
    listings.iter().map(Listing::to_product).collect()
}

// =============================================================================
// Catalog
// =============================================================================

const CATALOG: &[Listing] = &[
    Listing {
        id: "laptop-1",
        title: "UltraBook Pro 16",
        description: "Powerful laptop for professionals",
        cents: 129_999,
        image: "https://images.unsplash.com/photo-1496181133206-80ce9b88a853?q=80&w=2071",
        rating: 4.8,
        featured: Some(true),
        category: Some("electronics"),
        specs: &["16GB RAM", "512GB SSD", "Intel i7", "14 hour battery"],
        ..Listing::BASE
    },
    Listing {
        id: "laptop-2",
        title: "GameMaster X",
        description: "Ultimate gaming experience",
        cents: 179_999,
        original_cents: Some(199_999),
        discount: Some(10.0),
        image: "https://images.unsplash.com/photo-1603302576837-37561b2e2302?q=80&w=2068",
        rating: 4.7,
        featured: Some(true),
        category: Some("electronics"),
        specs: &["32GB RAM", "1TB SSD", "RTX 4070", "17.3\" 144Hz display"],
        ..Listing::BASE
    },
    Listing {
        id: "phone-1",
        title: "Galaxy S22 Ultra",
        description: "Professional-grade camera system",
        cents: 119_999,
        image: "https://images.unsplash.com/photo-1598327105666-5b89351aff97?q=80&w=2127",
        rating: 4.7,
        featured: Some(true),
        category: Some("electronics"),
        specs: &["108MP camera", "6.8\" AMOLED", "5000mAh battery", "256GB storage"],
        ..Listing::BASE
    },
    Listing {
        id: "audio-1",
        title: "SoundMaster Pro",
        description: "Premium noise cancellation",
        cents: 34_999,
        image: "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?q=80&w=2070",
        rating: 4.8,
        featured: Some(false),
        category: Some("electronics"),
        specs: &["40h battery", "ANC", "Hi-Res Audio", "Bluetooth 5.2"],
        ..Listing::BASE
    },
    Listing {
        id: "watch-1",
        title: "Smart Watch Pro",
        description: "Track your fitness and stay connected",
        cents: 24_999,
        image: "https://images.unsplash.com/photo-1579586337278-3befd40fd17a?q=80&w=2072",
        rating: 4.5,
        featured: Some(true),
        category: Some("electronics"),
        specs: &["Heart rate monitor", "GPS", "7-day battery", "Water resistant"],
        ..Listing::BASE
    },
    Listing {
        id: "tv-1",
        title: "Ultra HD Smart TV 65\"",
        description: "Immersive viewing experience",
        cents: 79_999,
        original_cents: Some(99_999),
        discount: Some(20.0),
        image: "https://images.unsplash.com/photo-1593784991095-a205069470b6?q=80&w=2070",
        rating: 4.7,
        featured: Some(true),
        category: Some("electronics"),
        specs: &["65\" 4K", "HDR10+", "Smart assistant", "Game mode"],
        ..Listing::BASE
    },
    Listing {
        id: "fashion-1",
        title: "Premium Wool Coat",
        description: "Elegant wool coat for winter",
        cents: 19_999,
        image: "https://images.unsplash.com/photo-1544022613-e87ca75a784a?q=80&w=1974",
        rating: 4.6,
        featured: Some(false),
        category: Some("fashion"),
        specs: &["100% Wool", "Dry clean only", "Multiple colors", "Sizes XS-XXL"],
        ..Listing::BASE
    },
    Listing {
        id: "furniture-1",
        title: "Ergonomic Office Chair",
        description: "Premium comfortable chair for your workspace",
        cents: 34_999,
        original_cents: Some(39_999),
        discount: Some(12.0),
        image: "https://images.unsplash.com/photo-1505843490701-5be5d1b31f8f?q=80&w=1887",
        rating: 4.9,
        featured: Some(true),
        category: Some("home"),
        specs: &["Adjustable height", "Lumbar support", "Breathable mesh", "360° swivel"],
        ..Listing::BASE
    },
];

/// The full demo catalog, in display order.
pub(super) fn catalog() -> Vec<Product> {
    products(CATALOG)
}

// =============================================================================
// Recommendation sets
// =============================================================================

const LAPTOPS: &[Listing] = &[
    Listing {
        id: "laptop-1",
        title: "UltraBook Pro 16",
        description: "Powerful laptop for professionals",
        cents: 129_999,
        rating: 4.8,
        specs: &["16GB RAM", "512GB SSD", "Intel i7", "14 hour battery"],
        ..Listing::BASE
    },
    Listing {
        id: "laptop-2",
        title: "GameMaster X",
        description: "Ultimate gaming experience",
        cents: 179_999,
        original_cents: Some(199_999),
        discount: Some(10.0),
        rating: 4.7,
        specs: &["32GB RAM", "1TB SSD", "RTX 4070", "17.3\" 144Hz display"],
        ..Listing::BASE
    },
    Listing {
        id: "laptop-3",
        title: "SlimBook Air",
        description: "Ultraportable and stylish",
        cents: 89_999,
        rating: 4.5,
        specs: &["8GB RAM", "256GB SSD", "Intel i5", "Weighs only 2.2 lbs"],
        ..Listing::BASE
    },
    Listing {
        id: "laptop-4",
        title: "WorkStation Pro",
        description: "For demanding professional tasks",
        cents: 249_999,
        rating: 4.9,
        specs: &["64GB RAM", "2TB SSD", "Intel Xeon", "15.6\" 4K display"],
        ..Listing::BASE
    },
];

const PHONES: &[Listing] = &[
    Listing {
        id: "phone-1",
        title: "Galaxy S22 Ultra",
        description: "Professional-grade camera system",
        cents: 119_999,
        rating: 4.7,
        specs: &["108MP camera", "6.8\" AMOLED", "5000mAh battery", "256GB storage"],
        ..Listing::BASE
    },
    Listing {
        id: "phone-2",
        title: "iPhone 14 Pro",
        description: "Cutting-edge performance",
        cents: 99_999,
        rating: 4.8,
        specs: &["A16 Bionic", "Dynamic Island", "48MP camera", "6.1\" ProMotion"],
        ..Listing::BASE
    },
    Listing {
        id: "phone-3",
        title: "Pixel 7 Pro",
        description: "The best of Google AI",
        cents: 89_999,
        original_cents: Some(99_999),
        discount: Some(10.0),
        rating: 4.6,
        specs: &["Tensor G2", "Magic Eraser", "50MP camera", "6.7\" LTPO OLED"],
        ..Listing::BASE
    },
];

const AUDIO: &[Listing] = &[
    Listing {
        id: "audio-1",
        title: "SoundMaster Pro",
        description: "Premium noise cancellation",
        cents: 34_999,
        rating: 4.8,
        specs: &["40h battery", "ANC", "Hi-Res Audio", "Bluetooth 5.2"],
        ..Listing::BASE
    },
    Listing {
        id: "audio-2",
        title: "AirBuds Ultra",
        description: "True wireless freedom",
        cents: 19_999,
        original_cents: Some(24_999),
        discount: Some(20.0),
        rating: 4.7,
        specs: &["8h playback", "Wireless charging", "IPX7 waterproof", "Touch controls"],
        ..Listing::BASE
    },
    Listing {
        id: "audio-3",
        title: "BassDrop Studio",
        description: "Immersive bass experience",
        cents: 27_999,
        rating: 4.6,
        specs: &["36h battery", "Enhanced bass", "Foldable design", "Built-in mic"],
        ..Listing::BASE
    },
];

const TRENDING: &[Listing] = &[
    Listing {
        id: "trending-1",
        title: "Smart Watch Pro",
        description: "Track your fitness and stay connected",
        cents: 24_999,
        rating: 4.5,
        specs: &["Heart rate monitor", "GPS", "7-day battery", "Water resistant"],
        ..Listing::BASE
    },
    Listing {
        id: "trending-2",
        title: "Ultra HD Smart TV",
        description: "Immersive viewing experience",
        cents: 79_999,
        original_cents: Some(99_999),
        discount: Some(20.0),
        rating: 4.7,
        specs: &["65\" 4K", "HDR10+", "Smart assistant", "Game mode"],
        ..Listing::BASE
    },
    Listing {
        id: "trending-3",
        title: "Wireless Charging Pad",
        description: "Convenient charging for all devices",
        cents: 3_999,
        rating: 4.3,
        specs: &["15W fast charging", "Multi-device", "LED indicator", "Slim design"],
        ..Listing::BASE
    },
];

pub(super) fn laptops() -> Vec<Product> {
    products(LAPTOPS)
}

pub(super) fn phones() -> Vec<Product> {
    products(PHONES)
}

pub(super) fn audio() -> Vec<Product> {
    products(AUDIO)
}

pub(super) fn trending() -> Vec<Product> {
    products(TRENDING)
}

// =============================================================================
// History
// =============================================================================

/// 2023-04-15T10:30:00Z
const APRIL_15: i64 = 1_681_554_600;
/// 2023-03-22T14:45:00Z
const MARCH_22: i64 = 1_679_496_300;
/// 2023-02-10T09:15:00Z
const FEBRUARY_10: i64 = 1_676_020_500;

fn at(epoch_seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(epoch_seconds, 0).unwrap_or_default()
}

fn acquired(id: &str, title: &str, cents: i64) -> AcquisitionItem {
    AcquisitionItem {
        id: ProductId::new(id),
        title: title.to_string(),
        price: Price::from_cents(cents),
        quantity: 1,
        image: HISTORY_IMAGE.to_string(),
    }
}

pub(super) fn acquisitions() -> Vec<Acquisition> {
    vec![
        Acquisition {
            id: AcquisitionId::new("ACQ-1234"),
            date: at(APRIL_15),
            total: Price::from_cents(129_999),
            status: OrderStatus::Delivered,
            items: vec![acquired("laptop-1", "UltraBook Pro 16", 129_999)],
        },
        Acquisition {
            id: AcquisitionId::new("ACQ-5678"),
            date: at(MARCH_22),
            total: Price::from_cents(24_997),
            status: OrderStatus::Shipped,
            items: vec![
                acquired("audio-1", "SoundMaster Pro", 19_999),
                acquired("accessory-1", "Wireless Charging Pad", 4_998),
            ],
        },
        Acquisition {
            id: AcquisitionId::new("ACQ-9012"),
            date: at(FEBRUARY_10),
            total: Price::from_cents(99_999),
            status: OrderStatus::Delivered,
            items: vec![acquired("phone-2", "iPhone 14 Pro", 99_999)],
        },
    ]
}

fn summary(id: &str, title: &str, date: i64, preview: &str, products: &[&str]) -> SessionSummary {
    SessionSummary {
        id: SessionId::new(id),
        title: title.to_string(),
        date: at(date),
        preview: preview.to_string(),
        products: products.iter().map(|p| (*p).to_string()).collect(),
    }
}

pub(super) fn sessions() -> Vec<SessionSummary> {
    vec![
        summary(
            "session_1681558200000",
            "Laptop Shopping",
            APRIL_15,
            "I need a new laptop for work and gaming. Something with good battery life and a powerful GPU.",
            &["UltraBook Pro 16", "GameMaster X", "SlimBook Air"],
        ),
        summary(
            "session_1679493900000",
            "Headphone Recommendations",
            MARCH_22,
            "Looking for noise-cancelling headphones for travel. Budget around $300.",
            &["SoundMaster Pro", "BassDrop Studio"],
        ),
        summary(
            "session_1676022900000",
            "Smartphone Comparison",
            FEBRUARY_10,
            "Help me choose between the latest iPhone and Galaxy models. Camera quality is important to me.",
            &["iPhone 14 Pro", "Galaxy S22 Ultra", "Pixel 7 Pro"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_shape() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 8);
        assert_eq!(catalog.iter().filter(|p| p.is_featured()).count(), 6);
        assert_eq!(catalog[1].original_price, Some(Price::from_cents(199_999)));
        assert!(catalog.iter().all(|p| p.image.starts_with("https://")));
    }

    #[test]
    fn test_recommendation_sets_use_placeholder_images() {
        for set in [laptops(), phones(), audio(), trending()] {
            assert!(set.iter().all(|p| p.image == RECOMMENDATION_IMAGE));
        }
    }

    #[test]
    fn test_history_dates() {
        let acquisitions = acquisitions();
        assert_eq!(acquisitions[0].date.to_rfc3339(), "2023-04-15T10:30:00+00:00");
        assert_eq!(acquisitions[1].items.len(), 2);
        assert_eq!(sessions()[2].date.to_rfc3339(), "2023-02-10T09:15:00+00:00");
    }
}

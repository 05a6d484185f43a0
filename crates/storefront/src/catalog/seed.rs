//! Launch assortment loaded at process start.

use cannabiabuds_core::{Price, ProductCategory, ProductId, StrainType};

use super::Product;

struct Seed {
    id: &'static str,
    name: &'static str,
    category: ProductCategory,
    strain_type: StrainType,
    price_cents: u32,
    sale_cents: Option<u32>,
    thc: f64,
    cbd: f64,
    description: &'static str,
    effects: &'static [&'static str],
    flavors: &'static [&'static str],
    image: &'static str,
    rating: f64,
    reviews: u32,
}

const SEEDS: &[Seed] = &[
    Seed {
        id: "1",
        name: "Blue Dream",
        category: ProductCategory::Flower,
        strain_type: StrainType::Hybrid,
        price_cents: 4500,
        sale_cents: Some(3500),
        thc: 18.5,
        cbd: 0.1,
        description: "A legendary sativa-dominant hybrid originating in California. Balancing full-body relaxation with gentle cerebral invigoration.",
        effects: &["Creative", "Energetic", "Euphoric"],
        flavors: &["Berry", "Sweet", "Vanilla"],
        image: "https://picsum.photos/id/10/500/500",
        rating: 4.8,
        reviews: 120,
    },
    Seed {
        id: "2",
        name: "OG Kush",
        category: ProductCategory::Flower,
        strain_type: StrainType::Hybrid,
        price_cents: 5000,
        sale_cents: None,
        thc: 24.0,
        cbd: 0.2,
        description: "Cherished for its ability to crush stress under the weight of its heavy euphoria. It carries an earthy pine and sour lemon scent.",
        effects: &["Relaxed", "Happy", "Sleepy"],
        flavors: &["Earthy", "Woody", "Pine"],
        image: "https://picsum.photos/id/11/500/500",
        rating: 4.9,
        reviews: 350,
    },
    Seed {
        id: "3",
        name: "Sour Diesel",
        category: ProductCategory::Vapes,
        strain_type: StrainType::Sativa,
        price_cents: 3500,
        sale_cents: None,
        thc: 85.0,
        cbd: 0.5,
        description: "Invigorating, fast-acting sativa-dominant strain named for its pungent, diesel-like aroma.",
        effects: &["Energetic", "Happy", "Uplifted"],
        flavors: &["Diesel", "Pungent", "Earthy"],
        image: "https://picsum.photos/id/12/500/500",
        rating: 4.5,
        reviews: 89,
    },
    Seed {
        id: "4",
        name: "Midnight Berry Gummies",
        category: ProductCategory::Edibles,
        strain_type: StrainType::Indica,
        price_cents: 2500,
        sale_cents: None,
        // mg per serving
        thc: 10.0,
        cbd: 5.0,
        description: "Perfect for winding down after a long day. Infused with CBN for extra sleep support.",
        effects: &["Sleepy", "Relaxed", "Hungry"],
        flavors: &["Berry", "Sweet"],
        image: "https://picsum.photos/id/13/500/500",
        rating: 4.7,
        reviews: 210,
    },
    Seed {
        id: "5",
        name: "Pain Relief Balm",
        category: ProductCategory::Topicals,
        strain_type: StrainType::Cbd,
        price_cents: 4000,
        sale_cents: None,
        thc: 1.0,
        cbd: 200.0,
        description: "Non-psychoactive topical cream designed to melt away muscle soreness and joint pain.",
        effects: &["Relaxed", "Pain Relief"],
        flavors: &["Mint", "Eucalyptus"],
        image: "https://picsum.photos/id/14/500/500",
        rating: 4.6,
        reviews: 55,
    },
    Seed {
        id: "6",
        name: "Granddaddy Purple",
        category: ProductCategory::Flower,
        strain_type: StrainType::Indica,
        price_cents: 5500,
        sale_cents: Some(4500),
        thc: 21.0,
        cbd: 0.1,
        description: "Famous indica cross of Purple Urkle and Big Bud. Delivers a fusion of cerebral euphoria and physical relaxation.",
        effects: &["Sleepy", "Relaxed", "Hungry"],
        flavors: &["Grape", "Berry", "Sweet"],
        image: "https://picsum.photos/id/15/500/500",
        rating: 4.9,
        reviews: 420,
    },
];

/// The fixed seed list, in menu order.
#[must_use]
pub fn seed_products() -> Vec<Product> {
    SEEDS
        .iter()
        .map(|seed| Product {
            id: ProductId::new(seed.id),
            name: seed.name.to_owned(),
            category: seed.category,
            strain_type: seed.strain_type,
            price: Price::from_cents(seed.price_cents),
            sale_price: seed.sale_cents.map(Price::from_cents),
            thc: seed.thc,
            cbd: seed.cbd,
            description: seed.description.to_owned(),
            effects: seed.effects.iter().map(|&s| s.to_owned()).collect(),
            flavors: seed.flavors.iter().map(|&s| s.to_owned()).collect(),
            image: seed.image.to_owned(),
            rating: seed.rating,
            reviews: seed.reviews,
            in_stock: true,
        })
        .collect()
}

//! Static studio content shared by the chat assistant and the front-ends.

use crate::map::{LngLat, MapView, Marker};

pub const STUDIO_NAME: &str = "ARCHITECT";

/// Description sent alongside every question forwarded to the remote assistant.
pub const SITE_CONTEXT: &str = "ARCHITECT — студия архитектуры и дизайна. Специализируемся на современной архитектуре, минимализме и функциональном дизайне. Портфолио включает жилые дома, общественные здания и интерьеры премиум-класса.";

/// Opening line of a fresh conversation.
pub const GREETING: &str = "Здравствуйте! Я виртуальный помощник ARCHITECT. Чем могу помочь?";

pub const ADDRESS: &str = "г. Москва, ул. Архитекторов, 15, офис 402";
pub const PHONE: &str = "+7 (495) 123-45-67";
pub const EMAIL: &str = "hello@architect.studio";

/// Office location shown on the contact map.
pub fn studio_map() -> MapView {
    let office = LngLat::new(37.6173, 55.7558);
    MapView {
        center: office,
        zoom: 13.0,
        markers: vec![Marker::new(office, "ARCHITECT Studio")],
    }
}

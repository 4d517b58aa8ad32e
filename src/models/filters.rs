use std::collections::BTreeSet;

use super::vendor::{Category, PriceTier};

/// Filtro de categoría
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// "all": deja pasar todo
    #[default]
    All,
    /// Coincidencia exacta con una categoría
    One(Category),
    /// Selección múltiple (página del mapa); vacía deja pasar todo
    AnyOf(BTreeSet<Category>),
}

impl CategoryFilter {
    pub fn accepts(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::One(selected) => *selected == category,
            CategoryFilter::AnyOf(selected) => selected.is_empty() || selected.contains(&category),
        }
    }

    pub fn is_active(&self) -> bool {
        match self {
            CategoryFilter::All => false,
            CategoryFilter::One(_) => true,
            CategoryFilter::AnyOf(selected) => !selected.is_empty(),
        }
    }

    /// Marcar/desmarcar una categoría en modo selección múltiple
    pub fn toggle(&mut self, category: Category, checked: bool) {
        let mut selected = match std::mem::take(self) {
            CategoryFilter::AnyOf(selected) => selected,
            CategoryFilter::One(current) => BTreeSet::from([current]),
            CategoryFilter::All => BTreeSet::new(),
        };
        if checked {
            selected.insert(category);
        } else {
            selected.remove(&category);
        }
        *self = CategoryFilter::AnyOf(selected);
    }
}

/// Predicados independientes, aplicados en conjunción
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VendorFilter {
    pub query: String,
    pub category: CategoryFilter,
    /// Vacío = sin filtro de precio
    pub price_tiers: BTreeSet<PriceTier>,
    pub open_only: bool,
    pub verified_only: bool,
    /// Millas; None = sin límite
    pub max_distance: Option<f64>,
    /// Límite de la página, restaurado al limpiar
    pub default_max_distance: Option<f64>,
}

impl VendorFilter {
    pub fn set_price_tier(&mut self, tier: PriceTier, checked: bool) {
        if checked {
            self.price_tiers.insert(tier);
        } else {
            self.price_tiers.remove(&tier);
        }
    }

    /// Limpia los filtros: distancia al valor de la página, mismo modo de categoría
    pub fn clear(&mut self) {
        let category = match self.category {
            CategoryFilter::AnyOf(_) => CategoryFilter::AnyOf(BTreeSet::new()),
            _ => CategoryFilter::All,
        };
        let default_max_distance = self.default_max_distance;
        *self = VendorFilter {
            category,
            max_distance: default_max_distance,
            default_max_distance,
            ..VendorFilter::default()
        };
    }

    pub fn has_active_filters(&self) -> bool {
        !self.query.trim().is_empty()
            || self.category.is_active()
            || !self.price_tiers.is_empty()
            || self.open_only
            || self.verified_only
    }
}

/// Clave de orden de las listas de vendedores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Rating descendente
    Rating,
    /// Número de reseñas descendente
    Reviews,
    /// Distancia ascendente
    Distance,
    /// Fecha de alta descendente
    Newest,
    /// Nombre ascendente
    Alphabetical,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Rating => "rating",
            SortKey::Reviews => "reviews",
            SortKey::Distance => "distance",
            SortKey::Newest => "newest",
            SortKey::Alphabetical => "alphabetical",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Rating => "Highest Rated",
            SortKey::Reviews => "Most Reviewed",
            SortKey::Distance => "Nearest",
            SortKey::Newest => "Newest",
            SortKey::Alphabetical => "A-Z",
        }
    }

    pub fn parse(value: &str) -> Option<SortKey> {
        [
            SortKey::Rating,
            SortKey::Reviews,
            SortKey::Distance,
            SortKey::Newest,
            SortKey::Alphabetical,
        ]
        .into_iter()
        .find(|k| k.as_str() == value)
    }
}

/// Clave de orden de la página de favoritos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FavoriteSortKey {
    /// Añadidos recientemente
    #[default]
    Recent,
    /// Visitados recientemente (sin visita al final)
    Visited,
    Rating,
    Distance,
    Alphabetical,
}

impl FavoriteSortKey {
    pub const ALL: [FavoriteSortKey; 5] = [
        FavoriteSortKey::Recent,
        FavoriteSortKey::Visited,
        FavoriteSortKey::Rating,
        FavoriteSortKey::Distance,
        FavoriteSortKey::Alphabetical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FavoriteSortKey::Recent => "recent",
            FavoriteSortKey::Visited => "visited",
            FavoriteSortKey::Rating => "rating",
            FavoriteSortKey::Distance => "distance",
            FavoriteSortKey::Alphabetical => "alphabetical",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FavoriteSortKey::Recent => "Recently Added",
            FavoriteSortKey::Visited => "Recently Visited",
            FavoriteSortKey::Rating => "Highest Rated",
            FavoriteSortKey::Distance => "Nearest",
            FavoriteSortKey::Alphabetical => "A-Z",
        }
    }

    pub fn parse(value: &str) -> Option<FavoriteSortKey> {
        FavoriteSortKey::ALL.into_iter().find(|k| k.as_str() == value)
    }
}

/// Controles de una página de lista: filtros + orden activo
#[derive(Debug, Clone, PartialEq)]
pub struct ListControls {
    pub filter: VendorFilter,
    /// None = orden del catálogo (página del mapa)
    pub sort: Option<SortKey>,
    /// Claves de orden que ofrece la página
    pub sort_options: Vec<SortKey>,
}

impl ListControls {
    /// Discover: orden por distancia y límite de distancia
    pub fn discover(max_distance: f64) -> Self {
        Self {
            filter: VendorFilter {
                max_distance: Some(max_distance),
                default_max_distance: Some(max_distance),
                ..VendorFilter::default()
            },
            sort: Some(SortKey::Distance),
            sort_options: vec![
                SortKey::Distance,
                SortKey::Rating,
                SortKey::Reviews,
                SortKey::Alphabetical,
            ],
        }
    }

    /// Directorio completo: orden por rating, filtro de verificados disponible
    pub fn directory() -> Self {
        Self {
            filter: VendorFilter::default(),
            sort: Some(SortKey::Rating),
            sort_options: vec![
                SortKey::Rating,
                SortKey::Reviews,
                SortKey::Distance,
                SortKey::Newest,
                SortKey::Alphabetical,
            ],
        }
    }

    /// Mapa: selección múltiple de categorías, sin orden
    pub fn map() -> Self {
        Self {
            filter: VendorFilter {
                category: CategoryFilter::AnyOf(BTreeSet::new()),
                ..VendorFilter::default()
            },
            sort: None,
            sort_options: Vec::new(),
        }
    }
}

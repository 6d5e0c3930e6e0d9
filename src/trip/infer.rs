use crate::trip::types::ActivityType;

/// External place-API category tags mapped to our categories.
const TAG_TABLE: &[(&str, ActivityType)] = &[
    ("restaurant", ActivityType::Restaurant),
    ("meal_takeaway", ActivityType::Restaurant),
    ("food", ActivityType::Restaurant),
    ("cafe", ActivityType::Cafe),
    ("bakery", ActivityType::Cafe),
    ("supermarket", ActivityType::Grocery),
    ("grocery_or_supermarket", ActivityType::Grocery),
    ("convenience_store", ActivityType::Grocery),
    ("playground", ActivityType::Playground),
    ("park", ActivityType::Playground),
    ("museum", ActivityType::Museum),
    ("art_gallery", ActivityType::Museum),
    ("shopping_mall", ActivityType::Shopping),
    ("store", ActivityType::Shopping),
    ("natural_feature", ActivityType::Scenic),
    ("scenic_lookout", ActivityType::Scenic),
    ("train_station", ActivityType::Transport),
    ("airport", ActivityType::Transport),
    ("ferry_terminal", ActivityType::Transport),
    ("tourist_attraction", ActivityType::Attraction),
    ("amusement_park", ActivityType::Attraction),
    ("zoo", ActivityType::Attraction),
];

/// Name keyword lists, checked in order. Specific categories come before
/// generic ones because the generic keyword sets overlap (a supermarket
/// name also matches "shop").
const KEYWORD_TABLE: &[(ActivityType, &[&str])] = &[
    (
        ActivityType::Grocery,
        &[
            "supermarket",
            "grocery",
            "woolworths",
            "countdown",
            "new world",
            "pak'nsave",
            "paknsave",
            "four square",
            "aldi",
            "coles",
        ],
    ),
    (
        ActivityType::Playground,
        &["playground", "play area", "playpark"],
    ),
    (
        ActivityType::Restaurant,
        &[
            "restaurant",
            "dinner",
            "lunch",
            "eatery",
            "bistro",
            "diner",
            "bbq",
            "burger",
            "pizza",
        ],
    ),
    (
        ActivityType::Cafe,
        &["cafe", "coffee", "espresso", "bakery", "brunch", "breakfast"],
    ),
    (
        ActivityType::Hike,
        &["hike", "track", "trail", "walk", "tramping", "summit"],
    ),
    (ActivityType::Beach, &["beach", "bay", "cove", "surf"]),
    (
        ActivityType::Museum,
        &["museum", "gallery", "exhibition", "heritage"],
    ),
    (
        ActivityType::Shopping,
        &["shop", "mall", "market", "store", "outlet"],
    ),
    (
        ActivityType::Transport,
        &["airport", "ferry", "train", "station", "shuttle", "transfer"],
    ),
    (
        ActivityType::Scenic,
        &["lookout", "viewpoint", "scenic", "falls", "waterfall", "glacier", "gorge"],
    ),
    (
        ActivityType::Attraction,
        &["gondola", "luge", "cruise", "tour", "park", "garden", "attraction"],
    ),
];

/// Infer a category from an activity name and optional external tags.
///
/// Precedence: an already-authored type wins, then the external tag table,
/// then ordered keyword matching on the lowercased name. Deterministic;
/// derivable from name+tags alone.
pub fn infer_activity_type(
    authored: Option<ActivityType>,
    name: &str,
    tags: &[String],
) -> ActivityType {
    if let Some(existing) = authored {
        return existing;
    }

    for tag in tags {
        let tag = tag.to_ascii_lowercase();
        if let Some((_, category)) = TAG_TABLE.iter().find(|(t, _)| *t == tag) {
            return *category;
        }
    }

    let name = name.to_lowercase();
    for (category, keywords) in KEYWORD_TABLE {
        if keywords.iter().any(|k| name.contains(k)) {
            return *category;
        }
    }

    ActivityType::Other
}

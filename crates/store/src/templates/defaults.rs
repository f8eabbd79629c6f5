//! Built-in templates seeded into every new store

use chrono::Utc;
use inspection_model::{
    InspectionItem, InspectionSection, InspectionTemplate, ItemId, SectionId, TemplateId,
    TemplateType,
};

/// (section name, [(item name, item description, required)])
type SectionSeed = (&'static str, &'static [(&'static str, &'static str, bool)]);

const ROUTINE: &[SectionSeed] = &[
    (
        "Exterior",
        &[
            ("Roof", "Missing shingles, sagging, or debris", true),
            ("Gutters", "Clear and securely attached", false),
            ("Walkways", "Cracks or trip hazards", false),
        ],
    ),
    (
        "Safety",
        &[
            ("Smoke Detectors", "Test every unit", true),
            ("Carbon Monoxide Detectors", "Test every unit", true),
            ("Fire Extinguisher", "Charged and in date", false),
        ],
    ),
    (
        "Plumbing",
        &[
            ("Leaks", "Under sinks and around toilets", true),
            ("Water Heater", "Rust, leaks, or pilot issues", false),
        ],
    ),
];

const MOVE_IN: &[SectionSeed] = &[
    (
        "Living Room",
        &[
            ("Walls", "Holes, scuffs, or stains", true),
            ("Flooring", "Carpet stains or damaged boards", true),
            ("Windows", "Open, close, and lock", false),
        ],
    ),
    (
        "Kitchen",
        &[
            ("Appliances", "Power on and run briefly", true),
            ("Cabinets", "Doors and hinges intact", false),
            ("Sink", "Drains freely, no leaks", true),
        ],
    ),
    (
        "Bathroom",
        &[
            ("Toilet", "Flushes and refills", true),
            ("Shower", "Water pressure and grout", false),
        ],
    ),
];

const MOVE_OUT: &[SectionSeed] = &[
    (
        "General",
        &[
            ("Keys Returned", "All keys and remotes", true),
            ("Cleanliness", "Compare against move-in condition", true),
        ],
    ),
    (
        "Damage",
        &[
            ("Walls", "New holes or paint damage", true),
            ("Flooring", "New stains or scratches", true),
            ("Fixtures", "Missing or broken fixtures", false),
        ],
    ),
];

fn build(
    key: &str,
    name: &str,
    description: &str,
    template_type: TemplateType,
    seeds: &[SectionSeed],
) -> InspectionTemplate {
    let now = Utc::now();
    let sections = seeds
        .iter()
        .enumerate()
        .map(|(si, (section_name, items))| {
            let items = items
                .iter()
                .enumerate()
                .map(|(ii, (item_name, item_description, required))| InspectionItem {
                    id: ItemId::new(format!("{}-s{}-i{}", key, si + 1, ii + 1)),
                    name: item_name.to_string(),
                    description: item_description.to_string(),
                    required: *required,
                })
                .collect();
            InspectionSection::new(
                SectionId::new(format!("{}-s{}", key, si + 1)),
                *section_name,
                items,
            )
        })
        .collect();

    InspectionTemplate {
        id: TemplateId::new(format!("default-{}", key)),
        name: name.to_string(),
        description: description.to_string(),
        template_type,
        sections,
        created_at: now,
        updated_at: now,
        is_default: true,
    }
}

/// The protected templates every seeded store starts with
pub fn default_templates() -> Vec<InspectionTemplate> {
    vec![
        build(
            "routine",
            "Routine Inspection",
            "Periodic check of the property's overall condition",
            TemplateType::Routine,
            ROUTINE,
        ),
        build(
            "move-in",
            "Move-In Inspection",
            "Baseline condition report when a tenant moves in",
            TemplateType::MoveIn,
            MOVE_IN,
        ),
        build(
            "move-out",
            "Move-Out Inspection",
            "Condition report compared against the move-in baseline",
            TemplateType::MoveOut,
            MOVE_OUT,
        ),
    ]
}

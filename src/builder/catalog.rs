//! Component catalog and factory.
//!
//! The catalog holds one [`ComponentDefinition`] per [`ComponentType`] with the
//! default property bag a freshly placed component starts from. The
//! [`ComponentFactory`] turns a type into a new, unattached [`BuilderComponent`].

use tracing::{debug, error};
use uuid::Uuid;

use super::component::{
    BuilderComponent, ComponentCategory, ComponentProperties, ComponentType, PropertyMap,
    PropertyValue,
};
use super::error::BuilderError;
use crate::constants::COPY_SUFFIX;

/// Template for one kind of component
#[derive(Debug, Clone)]
pub struct ComponentDefinition {
    pub component_type: ComponentType,
    pub category: ComponentCategory,
    pub display_name: &'static str,
    pub description: &'static str,
    pub can_have_children: bool,
    pub default_properties: ComponentProperties,
}

fn section(entries: &[(&str, PropertyValue)]) -> PropertyMap {
    entries
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

fn text(value: &str) -> PropertyValue {
    PropertyValue::from(value)
}

fn styles(entries: &[(&str, &str)]) -> PropertyMap {
    entries
        .iter()
        .map(|(key, value)| (key.to_string(), PropertyValue::from(*value)))
        .collect()
}

fn class_only(class: &str) -> PropertyMap {
    section(&[("class", text(class))])
}

const FIELD_STYLES: &[(&str, &str)] = &[
    ("width", "100%"),
    ("padding", "10px 15px"),
    ("fontSize", "14px"),
    ("border", "1px solid #d0d0d0"),
    ("borderRadius", "4px"),
    ("backgroundColor", "#ffffff"),
];

const CHOICE_STYLES: &[(&str, &str)] = &[
    ("display", "flex"),
    ("alignItems", "center"),
    ("gap", "8px"),
    ("cursor", "pointer"),
];

impl ComponentType {
    /// Catalog entry for this type
    pub fn definition(&self) -> ComponentDefinition {
        let (display_name, description, content, style_map, attributes) = match self {
            ComponentType::Container => (
                "Container",
                "Flexible container for grouping other components",
                PropertyMap::new(),
                styles(&[
                    ("display", "block"),
                    ("width", "100%"),
                    ("maxWidth", "1200px"),
                    ("margin", "0 auto"),
                    ("padding", "20px"),
                    ("backgroundColor", "transparent"),
                ]),
                class_only("container"),
            ),
            ComponentType::Section => (
                "Section",
                "Semantic section for structuring content",
                PropertyMap::new(),
                styles(&[
                    ("display", "block"),
                    ("width", "100%"),
                    ("padding", "40px 20px"),
                    ("backgroundColor", "#ffffff"),
                ]),
                class_only("section"),
            ),
            ComponentType::Grid => (
                "Grid",
                "CSS grid laying items out in columns",
                PropertyMap::new(),
                styles(&[
                    ("display", "grid"),
                    ("gridTemplateColumns", "repeat(3, 1fr)"),
                    ("gap", "20px"),
                    ("width", "100%"),
                    ("padding", "20px"),
                ]),
                class_only("grid"),
            ),
            ComponentType::Flexbox => (
                "Flexbox",
                "Flexbox container for aligning items",
                PropertyMap::new(),
                styles(&[
                    ("display", "flex"),
                    ("flexDirection", "row"),
                    ("justifyContent", "flex-start"),
                    ("alignItems", "stretch"),
                    ("gap", "10px"),
                    ("width", "100%"),
                    ("padding", "20px"),
                ]),
                class_only("flexbox"),
            ),
            ComponentType::Divider => (
                "Divider",
                "Horizontal rule separating content",
                PropertyMap::new(),
                styles(&[
                    ("width", "100%"),
                    ("height", "1px"),
                    ("backgroundColor", "#e0e0e0"),
                    ("margin", "20px 0"),
                    ("border", "none"),
                ]),
                class_only("divider"),
            ),
            ComponentType::Input => (
                "Input",
                "Single-line text field",
                section(&[("placeholder", text("Enter text...")), ("value", text(""))]),
                styles(FIELD_STYLES),
                section(&[
                    ("type", text("text")),
                    ("name", text("input")),
                    ("class", text("input")),
                ]),
            ),
            ComponentType::Textarea => {
                let mut style_map = styles(FIELD_STYLES);
                style_map.insert("minHeight".to_string(), text("120px"));
                style_map.insert("resize".to_string(), text("vertical"));
                (
                    "Textarea",
                    "Multi-line text field",
                    section(&[("placeholder", text("Enter text...")), ("value", text(""))]),
                    style_map,
                    section(&[
                        ("name", text("textarea")),
                        ("rows", text("5")),
                        ("class", text("textarea")),
                    ]),
                )
            }
            ComponentType::Select => {
                let mut style_map = styles(FIELD_STYLES);
                style_map.insert("cursor".to_string(), text("pointer"));
                (
                    "Select",
                    "Drop-down list",
                    section(&[("value", text(""))]),
                    style_map,
                    section(&[("name", text("select")), ("class", text("select"))]),
                )
            }
            ComponentType::Checkbox => (
                "Checkbox",
                "Labelled checkbox",
                section(&[("label", text("Option")), ("value", PropertyValue::Bool(false))]),
                styles(CHOICE_STYLES),
                section(&[
                    ("type", text("checkbox")),
                    ("name", text("checkbox")),
                    ("class", text("checkbox")),
                ]),
            ),
            ComponentType::Radio => (
                "Radio",
                "Labelled radio button",
                section(&[("label", text("Option")), ("value", text(""))]),
                styles(CHOICE_STYLES),
                section(&[
                    ("type", text("radio")),
                    ("name", text("radio")),
                    ("class", text("radio")),
                ]),
            ),
            ComponentType::Button => (
                "Button",
                "Clickable button",
                section(&[("text", text("Click here"))]),
                styles(&[
                    ("padding", "12px 24px"),
                    ("fontSize", "14px"),
                    ("fontWeight", "600"),
                    ("color", "#ffffff"),
                    ("backgroundColor", "#4a90e2"),
                    ("border", "none"),
                    ("borderRadius", "4px"),
                    ("cursor", "pointer"),
                    ("transition", "background-color 0.2s ease"),
                ]),
                section(&[("type", text("button")), ("class", text("button"))]),
            ),
            ComponentType::Heading => (
                "Heading",
                "Section title",
                section(&[("text", text("Heading"))]),
                styles(&[
                    ("fontSize", "32px"),
                    ("fontWeight", "700"),
                    ("color", "#333333"),
                    ("margin", "0 0 16px 0"),
                    ("lineHeight", "1.2"),
                ]),
                class_only("heading"),
            ),
            ComponentType::Paragraph => (
                "Paragraph",
                "Block of body text",
                section(&[(
                    "text",
                    text("This is a paragraph of text. Click to edit it."),
                )]),
                styles(&[
                    ("fontSize", "16px"),
                    ("lineHeight", "1.6"),
                    ("color", "#666666"),
                    ("margin", "0 0 16px 0"),
                ]),
                class_only("paragraph"),
            ),
            ComponentType::List => (
                "List",
                "Bulleted list",
                PropertyMap::new(),
                styles(&[
                    ("margin", "0 0 16px 0"),
                    ("padding", "0 0 0 24px"),
                    ("fontSize", "16px"),
                    ("lineHeight", "1.6"),
                    ("color", "#666666"),
                ]),
                class_only("list"),
            ),
            ComponentType::Table => (
                "Table",
                "Data table",
                PropertyMap::new(),
                styles(&[
                    ("width", "100%"),
                    ("borderCollapse", "collapse"),
                    ("margin", "0 0 20px 0"),
                    ("fontSize", "14px"),
                ]),
                class_only("table"),
            ),
            ComponentType::Code => (
                "Code Block",
                "Preformatted code snippet",
                section(&[("text", text("// Your code here"))]),
                styles(&[
                    ("display", "block"),
                    ("padding", "16px"),
                    ("backgroundColor", "#f5f5f5"),
                    ("border", "1px solid #e0e0e0"),
                    ("borderRadius", "4px"),
                    ("fontFamily", "monospace"),
                    ("fontSize", "14px"),
                    ("lineHeight", "1.5"),
                    ("color", "#333333"),
                    ("overflow", "auto"),
                    ("margin", "0 0 16px 0"),
                ]),
                class_only("code"),
            ),
            ComponentType::Image => (
                "Image",
                "Responsive image",
                section(&[
                    ("src", text("https://via.placeholder.com/800x400")),
                    ("alt", text("Image description")),
                ]),
                styles(&[
                    ("width", "100%"),
                    ("height", "auto"),
                    ("maxWidth", "100%"),
                    ("display", "block"),
                    ("borderRadius", "4px"),
                ]),
                section(&[("class", text("image")), ("loading", text("lazy"))]),
            ),
            ComponentType::Video => (
                "Video",
                "Embedded video player",
                section(&[("src", text(""))]),
                styles(&[
                    ("width", "100%"),
                    ("maxWidth", "100%"),
                    ("height", "auto"),
                    ("borderRadius", "4px"),
                ]),
                section(&[("class", text("video")), ("controls", PropertyValue::Bool(true))]),
            ),
            ComponentType::Icon => (
                "Icon",
                "Single glyph icon",
                section(&[("text", text("\u{2b50}"))]),
                styles(&[
                    ("fontSize", "32px"),
                    ("display", "inline-block"),
                    ("lineHeight", "1"),
                ]),
                class_only("icon"),
            ),
            ComponentType::Gallery => (
                "Gallery",
                "Grid of media items",
                PropertyMap::new(),
                styles(&[
                    ("display", "grid"),
                    ("gridTemplateColumns", "repeat(auto-fit, minmax(250px, 1fr))"),
                    ("gap", "16px"),
                    ("width", "100%"),
                ]),
                class_only("gallery"),
            ),
            ComponentType::Card => (
                "Card",
                "Boxed content card",
                PropertyMap::new(),
                styles(&[
                    ("display", "block"),
                    ("padding", "24px"),
                    ("backgroundColor", "#ffffff"),
                    ("border", "1px solid #e0e0e0"),
                    ("borderRadius", "8px"),
                    ("boxShadow", "0 2px 4px rgba(0,0,0,0.1)"),
                ]),
                class_only("card"),
            ),
            ComponentType::Modal => (
                "Modal",
                "Dialog overlay",
                PropertyMap::new(),
                styles(&[
                    ("display", "none"),
                    ("position", "fixed"),
                    ("top", "50%"),
                    ("left", "50%"),
                    ("transform", "translate(-50%, -50%)"),
                    ("maxWidth", "600px"),
                    ("width", "90%"),
                    ("maxHeight", "90vh"),
                    ("backgroundColor", "#ffffff"),
                    ("padding", "32px"),
                    ("borderRadius", "8px"),
                    ("boxShadow", "0 4px 20px rgba(0,0,0,0.3)"),
                    ("zIndex", "1000"),
                ]),
                class_only("modal"),
            ),
            ComponentType::Tabs => (
                "Tabs",
                "Tabbed panels",
                PropertyMap::new(),
                styles(&[("display", "block"), ("width", "100%")]),
                class_only("tabs"),
            ),
            ComponentType::Accordion => (
                "Accordion",
                "Collapsible panels",
                PropertyMap::new(),
                styles(&[
                    ("display", "block"),
                    ("width", "100%"),
                    ("border", "1px solid #e0e0e0"),
                    ("borderRadius", "4px"),
                ]),
                class_only("accordion"),
            ),
            ComponentType::Carousel => (
                "Carousel",
                "Sliding media carousel",
                PropertyMap::new(),
                styles(&[
                    ("display", "block"),
                    ("width", "100%"),
                    ("position", "relative"),
                    ("overflow", "hidden"),
                ]),
                class_only("carousel"),
            ),
        };

        ComponentDefinition {
            component_type: *self,
            category: self.category(),
            display_name,
            description,
            can_have_children: self.can_have_children(),
            default_properties: ComponentProperties {
                content,
                styles: style_map,
                attributes,
                events: PropertyMap::new(),
            },
        }
    }
}

/// All catalog entries of one category, in palette order
pub fn definitions_in(category: ComponentCategory) -> Vec<ComponentDefinition> {
    ComponentType::all()
        .iter()
        .filter(|ty| ty.category() == category)
        .map(ComponentType::definition)
        .collect()
}

/// Builds new component nodes from catalog templates
#[derive(Debug, Default, Clone, Copy)]
pub struct ComponentFactory;

impl ComponentFactory {
    pub fn generate_id() -> String {
        format!("comp_{}", Uuid::new_v4().simple())
    }

    /// Create an unattached node of the given type with catalog defaults
    pub fn create(&self, component_type: ComponentType) -> BuilderComponent {
        let definition = component_type.definition();
        let component = BuilderComponent {
            id: Self::generate_id(),
            component_type,
            category: definition.category,
            display_name: definition.display_name.to_string(),
            properties: definition.default_properties,
            children: Vec::new(),
            parent_id: None,
            order: 0,
            is_locked: false,
            is_hidden: false,
            is_selected: false,
            layer_id: None,
        };
        debug!("Created {} component {}", component_type.tag(), component.id);
        component
    }

    /// Create a node from a type tag; unknown tags are a catalog error
    pub fn create_from_tag(&self, tag: &str) -> Result<BuilderComponent, BuilderError> {
        match ComponentType::from_tag(tag) {
            Some(component_type) => Ok(self.create(component_type)),
            None => {
                error!("No catalog definition for component type {:?}", tag);
                Err(BuilderError::UnknownComponentType(tag.to_string()))
            }
        }
    }

    /// Deep copy with fresh ids for the whole subtree.
    ///
    /// The copy is detached (`parent_id` cleared on the root) and loses its
    /// selection flag; lock and visibility flags are kept.
    pub fn duplicate(&self, component: &BuilderComponent) -> BuilderComponent {
        let mut copy = component.clone();
        copy.display_name = format!("{}{}", component.display_name, COPY_SUFFIX);
        copy.parent_id = None;
        reassign_ids(&mut copy);
        copy
    }

    /// Copy for pasting: fresh ids, all state flags reset
    pub fn paste_copy(&self, component: &BuilderComponent) -> BuilderComponent {
        let mut copy = component.clone();
        copy.parent_id = None;
        reassign_ids(&mut copy);
        reset_flags(&mut copy);
        copy
    }
}

fn reassign_ids(component: &mut BuilderComponent) {
    component.id = ComponentFactory::generate_id();
    component.is_selected = false;
    let parent_id = component.id.clone();
    for child in &mut component.children {
        child.parent_id = Some(parent_id.clone());
        reassign_ids(child);
    }
}

fn reset_flags(component: &mut BuilderComponent) {
    component.is_selected = false;
    component.is_locked = false;
    component.is_hidden = false;
    for child in &mut component.children {
        reset_flags(child);
    }
}

//! Component node model: the placed elements that make up a page tree.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Every kind of component the palette can place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    // Layout
    Container,
    Section,
    Grid,
    Flexbox,
    Divider,
    // Forms
    Input,
    Textarea,
    Select,
    Checkbox,
    Radio,
    Button,
    // Content
    Heading,
    Paragraph,
    List,
    Table,
    Code,
    // Media
    Image,
    Video,
    Icon,
    Gallery,
    // Custom
    Card,
    Modal,
    Tabs,
    Accordion,
    Carousel,
}

impl ComponentType {
    pub fn all() -> &'static [ComponentType] {
        &[
            ComponentType::Container,
            ComponentType::Section,
            ComponentType::Grid,
            ComponentType::Flexbox,
            ComponentType::Divider,
            ComponentType::Input,
            ComponentType::Textarea,
            ComponentType::Select,
            ComponentType::Checkbox,
            ComponentType::Radio,
            ComponentType::Button,
            ComponentType::Heading,
            ComponentType::Paragraph,
            ComponentType::List,
            ComponentType::Table,
            ComponentType::Code,
            ComponentType::Image,
            ComponentType::Video,
            ComponentType::Icon,
            ComponentType::Gallery,
            ComponentType::Card,
            ComponentType::Modal,
            ComponentType::Tabs,
            ComponentType::Accordion,
            ComponentType::Carousel,
        ]
    }

    /// Lowercase tag used in saved pages and edit scripts
    pub fn tag(&self) -> &'static str {
        match self {
            ComponentType::Container => "container",
            ComponentType::Section => "section",
            ComponentType::Grid => "grid",
            ComponentType::Flexbox => "flexbox",
            ComponentType::Divider => "divider",
            ComponentType::Input => "input",
            ComponentType::Textarea => "textarea",
            ComponentType::Select => "select",
            ComponentType::Checkbox => "checkbox",
            ComponentType::Radio => "radio",
            ComponentType::Button => "button",
            ComponentType::Heading => "heading",
            ComponentType::Paragraph => "paragraph",
            ComponentType::List => "list",
            ComponentType::Table => "table",
            ComponentType::Code => "code",
            ComponentType::Image => "image",
            ComponentType::Video => "video",
            ComponentType::Icon => "icon",
            ComponentType::Gallery => "gallery",
            ComponentType::Card => "card",
            ComponentType::Modal => "modal",
            ComponentType::Tabs => "tabs",
            ComponentType::Accordion => "accordion",
            ComponentType::Carousel => "carousel",
        }
    }

    pub fn from_tag(tag: &str) -> Option<ComponentType> {
        Self::all().iter().copied().find(|ty| ty.tag() == tag)
    }

    pub fn category(&self) -> ComponentCategory {
        match self {
            ComponentType::Container
            | ComponentType::Section
            | ComponentType::Grid
            | ComponentType::Flexbox
            | ComponentType::Divider => ComponentCategory::Layout,
            ComponentType::Input
            | ComponentType::Textarea
            | ComponentType::Select
            | ComponentType::Checkbox
            | ComponentType::Radio
            | ComponentType::Button => ComponentCategory::Forms,
            ComponentType::Heading
            | ComponentType::Paragraph
            | ComponentType::List
            | ComponentType::Table
            | ComponentType::Code => ComponentCategory::Content,
            ComponentType::Image
            | ComponentType::Video
            | ComponentType::Icon
            | ComponentType::Gallery => ComponentCategory::Media,
            ComponentType::Card
            | ComponentType::Modal
            | ComponentType::Tabs
            | ComponentType::Accordion
            | ComponentType::Carousel => ComponentCategory::Custom,
        }
    }

    /// Whether nodes of this type may hold child components
    pub fn can_have_children(&self) -> bool {
        matches!(
            self,
            ComponentType::Container
                | ComponentType::Section
                | ComponentType::Grid
                | ComponentType::Flexbox
                | ComponentType::List
                | ComponentType::Table
                | ComponentType::Gallery
                | ComponentType::Card
                | ComponentType::Modal
                | ComponentType::Tabs
                | ComponentType::Accordion
                | ComponentType::Carousel
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentCategory {
    Layout,
    Forms,
    Content,
    Media,
    Custom,
}

impl ComponentCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            ComponentCategory::Layout => "Layout",
            ComponentCategory::Forms => "Forms",
            ComponentCategory::Content => "Content",
            ComponentCategory::Media => "Media",
            ComponentCategory::Custom => "Custom",
        }
    }
}

/// A primitive value stored in a property bag section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Number(value)
    }
}

/// One open-ended section of the property bag (content, styles, ...)
pub type PropertyMap = BTreeMap<String, PropertyValue>;

/// The per-node property bag
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentProperties {
    #[serde(default)]
    pub content: PropertyMap,
    #[serde(default)]
    pub styles: PropertyMap,
    #[serde(default)]
    pub attributes: PropertyMap,
    #[serde(default)]
    pub events: PropertyMap,
}

/// One placed element of the page tree.
///
/// `Clone` is a full deep copy of the node and its subtree; history snapshots
/// rely on that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuilderComponent {
    pub id: String,
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    pub category: ComponentCategory,
    pub display_name: String,
    #[serde(default)]
    pub properties: ComponentProperties,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BuilderComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub order: usize,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub is_selected: bool,
    /// Layer group the node belongs to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_id: Option<String>,
}

impl BuilderComponent {
    pub fn accepts_children(&self) -> bool {
        self.component_type.can_have_children()
    }

    /// Depth-first search of this node's subtree, including the node itself
    pub fn find(&self, id: &str) -> Option<&BuilderComponent> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Whether `id` names this node or one of its descendants
    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Ids of this node and all descendants in pre-order
    pub fn subtree_ids(&self) -> Vec<String> {
        let mut ids = Vec::new();
        self.collect_ids(&mut ids);
        ids
    }

    fn collect_ids(&self, ids: &mut Vec<String>) {
        ids.push(self.id.clone());
        for child in &self.children {
            child.collect_ids(ids);
        }
    }

    /// Number of nodes in this subtree, including the node itself
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(BuilderComponent::subtree_len)
            .sum::<usize>()
    }

    /// Text content shortcut (`content.text`)
    pub fn text(&self) -> Option<&str> {
        self.properties
            .content
            .get("text")
            .and_then(PropertyValue::as_str)
    }

    /// Shallow-merge a partial update into this node
    pub fn apply_update(&mut self, update: &ComponentUpdate) {
        if let Some(name) = &update.display_name {
            self.display_name = name.clone();
        }
        merge(&mut self.properties.content, &update.content);
        merge(&mut self.properties.styles, &update.styles);
        merge(&mut self.properties.attributes, &update.attributes);
        merge(&mut self.properties.events, &update.events);
        if let Some(locked) = update.is_locked {
            self.is_locked = locked;
        }
        if let Some(hidden) = update.is_hidden {
            self.is_hidden = hidden;
        }
        if let Some(selected) = update.is_selected {
            self.is_selected = selected;
        }
        if let Some(layer_id) = &update.layer_id {
            self.layer_id = layer_id.clone();
        }
    }
}

/// Keeps an explicit `null` apart from a missing field
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn merge(target: &mut PropertyMap, patch: &PropertyMap) {
    for (key, value) in patch {
        target.insert(key.clone(), value.clone());
    }
}

/// A partial update: every set field overwrites the matching node field,
/// property sections are merged key by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentUpdate {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub content: PropertyMap,
    #[serde(default)]
    pub styles: PropertyMap,
    #[serde(default)]
    pub attributes: PropertyMap,
    #[serde(default)]
    pub events: PropertyMap,
    #[serde(default)]
    pub is_locked: Option<bool>,
    #[serde(default)]
    pub is_hidden: Option<bool>,
    #[serde(default)]
    pub is_selected: Option<bool>,
    /// `Some(None)` takes the node out of its layer group
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub layer_id: Option<Option<String>>,
}

impl ComponentUpdate {
    pub fn with_content(mut self, key: &str, value: impl Into<PropertyValue>) -> Self {
        self.content.insert(key.to_string(), value.into());
        self
    }

    pub fn with_style(mut self, key: &str, value: impl Into<PropertyValue>) -> Self {
        self.styles.insert(key.to_string(), value.into());
        self
    }

    pub fn with_attribute(mut self, key: &str, value: impl Into<PropertyValue>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    pub fn with_event(mut self, key: &str, handler: &str) -> Self {
        self.events.insert(key.to_string(), handler.into());
        self
    }

    pub fn with_display_name(mut self, name: &str) -> Self {
        self.display_name = Some(name.to_string());
        self
    }

    pub fn locked(mut self, locked: bool) -> Self {
        self.is_locked = Some(locked);
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.is_hidden = Some(hidden);
        self
    }

    pub fn with_layer(mut self, layer_id: Option<&str>) -> Self {
        self.layer_id = Some(layer_id.map(str::to_string));
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == ComponentUpdate::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, ty: ComponentType) -> BuilderComponent {
        BuilderComponent {
            id: id.to_string(),
            component_type: ty,
            category: ty.category(),
            display_name: id.to_string(),
            properties: ComponentProperties::default(),
            children: Vec::new(),
            parent_id: None,
            order: 0,
            is_locked: false,
            is_hidden: false,
            is_selected: false,
            layer_id: None,
        }
    }

    #[test]
    fn test_catalog_has_every_kind_once() {
        assert_eq!(ComponentType::all().len(), 25);
        for ty in ComponentType::all() {
            assert_eq!(ComponentType::from_tag(ty.tag()), Some(*ty));
        }
    }

    #[test]
    fn test_from_tag_unknown() {
        assert!(ComponentType::from_tag("marquee").is_none());
    }

    #[test]
    fn test_category_derived_from_type() {
        assert_eq!(ComponentType::Button.category(), ComponentCategory::Forms);
        assert_eq!(ComponentType::Grid.category(), ComponentCategory::Layout);
        assert_eq!(ComponentType::Carousel.category(), ComponentCategory::Custom);
    }

    #[test]
    fn test_leaf_types_reject_children() {
        assert!(ComponentType::Container.can_have_children());
        assert!(!ComponentType::Button.can_have_children());
        assert!(!ComponentType::Heading.can_have_children());
    }

    #[test]
    fn test_find_and_subtree_ids() {
        let mut root = node("root", ComponentType::Container);
        let mut inner = node("inner", ComponentType::Card);
        inner.children.push(node("leaf", ComponentType::Button));
        root.children.push(inner);
        root.children.push(node("tail", ComponentType::Divider));

        assert!(root.contains("leaf"));
        assert!(!root.contains("missing"));
        assert_eq!(root.subtree_ids(), vec!["root", "inner", "leaf", "tail"]);
        assert_eq!(root.subtree_len(), 4);
    }

    #[test]
    fn test_apply_update_merges_sections() {
        let mut heading = node("h", ComponentType::Heading);
        heading
            .properties
            .styles
            .insert("color".to_string(), "#333".into());

        let update = ComponentUpdate::default()
            .with_content("text", "Hello")
            .with_style("fontSize", "40px")
            .hidden(true);
        heading.apply_update(&update);

        assert_eq!(heading.text(), Some("Hello"));
        assert_eq!(
            heading.properties.styles.get("color"),
            Some(&PropertyValue::from("#333"))
        );
        assert_eq!(
            heading.properties.styles.get("fontSize"),
            Some(&PropertyValue::from("40px"))
        );
        assert!(heading.is_hidden);
        assert!(!heading.is_locked);
    }

    #[test]
    fn test_layer_update_sets_and_clears() {
        let mut card = node("card", ComponentType::Card);
        card.apply_update(&ComponentUpdate::default().with_layer(Some("layer_a")));
        assert_eq!(card.layer_id.as_deref(), Some("layer_a"));

        // A missing field leaves the layer alone, an explicit null clears it
        let keep: ComponentUpdate = serde_json::from_str(r#"{"isHidden": true}"#).unwrap();
        card.apply_update(&keep);
        assert_eq!(card.layer_id.as_deref(), Some("layer_a"));

        let clear: ComponentUpdate = serde_json::from_str(r#"{"layerId": null}"#).unwrap();
        assert_eq!(clear.layer_id, Some(None));
        card.apply_update(&clear);
        assert!(card.layer_id.is_none());
    }

    #[test]
    fn test_component_json_shape() {
        let button = node("b1", ComponentType::Button);
        let json = serde_json::to_value(&button).unwrap();
        assert_eq!(json["type"], "button");
        assert_eq!(json["category"], "forms");
        assert_eq!(json["displayName"], "b1");
        assert!(json.get("children").is_none());
    }

    #[test]
    fn test_property_value_untagged() {
        let map: PropertyMap =
            serde_json::from_str(r#"{"disabled": true, "rows": 5, "name": "field"}"#).unwrap();
        assert_eq!(map.get("disabled"), Some(&PropertyValue::Bool(true)));
        assert_eq!(map.get("rows"), Some(&PropertyValue::Number(5.0)));
        assert_eq!(map.get("name").and_then(PropertyValue::as_str), Some("field"));
    }
}

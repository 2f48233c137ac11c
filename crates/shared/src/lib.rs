use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Уникальный идентификатор объекта в сцене
pub type ObjectId = String;

/// Минимально допустимый масштаб по каждой оси
pub const MIN_SCALE: f64 = 0.1;

/// Максимально допустимый масштаб по каждой оси
pub const MAX_SCALE: f64 = 1000.0;

/// Максимальное число объектов в сцене
pub const MAX_OBJECTS: usize = 1024;

// ============================================================================
// Тип примитива
// ============================================================================

/// Тип примитива
///
/// Неизвестные имена сохраняются как `Unknown`, чтобы импортированные данные
/// не терялись; генератор геометрии строит для них параллелепипед.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Box,
    Sphere,
    Cylinder,
    Cone,
    Torus,
    Pyramid,
    Octahedron,
    Dodecahedron,
    Icosahedron,
    Plane,
    Ring,
    Tube,
    Tetrahedron,
    Unknown(String),
}

static ALL_KINDS: [ShapeKind; 13] = [
    ShapeKind::Box,
    ShapeKind::Sphere,
    ShapeKind::Cylinder,
    ShapeKind::Cone,
    ShapeKind::Torus,
    ShapeKind::Pyramid,
    ShapeKind::Octahedron,
    ShapeKind::Dodecahedron,
    ShapeKind::Icosahedron,
    ShapeKind::Plane,
    ShapeKind::Ring,
    ShapeKind::Tube,
    ShapeKind::Tetrahedron,
];

impl ShapeKind {
    /// Все поддерживаемые типы (без `Unknown`)
    pub fn all() -> &'static [ShapeKind] {
        &ALL_KINDS
    }

    /// Имя типа в JSON
    pub fn as_str(&self) -> &str {
        match self {
            ShapeKind::Box => "box",
            ShapeKind::Sphere => "sphere",
            ShapeKind::Cylinder => "cylinder",
            ShapeKind::Cone => "cone",
            ShapeKind::Torus => "torus",
            ShapeKind::Pyramid => "pyramid",
            ShapeKind::Octahedron => "octahedron",
            ShapeKind::Dodecahedron => "dodecahedron",
            ShapeKind::Icosahedron => "icosahedron",
            ShapeKind::Plane => "plane",
            ShapeKind::Ring => "ring",
            ShapeKind::Tube => "tube",
            ShapeKind::Tetrahedron => "tetrahedron",
            ShapeKind::Unknown(name) => name,
        }
    }

    /// Разбор имени типа; "cube" — синоним "box"
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "box" | "cube" => ShapeKind::Box,
            "sphere" => ShapeKind::Sphere,
            "cylinder" => ShapeKind::Cylinder,
            "cone" => ShapeKind::Cone,
            "torus" => ShapeKind::Torus,
            "pyramid" => ShapeKind::Pyramid,
            "octahedron" => ShapeKind::Octahedron,
            "dodecahedron" => ShapeKind::Dodecahedron,
            "icosahedron" => ShapeKind::Icosahedron,
            "plane" => ShapeKind::Plane,
            "ring" => ShapeKind::Ring,
            "tube" => ShapeKind::Tube,
            "tetrahedron" => ShapeKind::Tetrahedron,
            _ => ShapeKind::Unknown(name.to_string()),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ShapeKind::Unknown(_))
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ShapeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ShapeKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(ShapeKind::parse(&name))
    }
}

// ============================================================================
// Векторы и цвет
// ============================================================================

/// Трёхкомпонентный вектор (позиция, поворот в радианах, масштаб)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3::new(0.0, 0.0, 0.0);
    pub const ONE: Vector3 = Vector3::new(1.0, 1.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Применить функцию к каждой компоненте
    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self::new(f(self.x), f(self.y), f(self.z))
    }
}

impl From<[f64; 3]> for Vector3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

/// Цвет RGB, в JSON — строка "#rrggbb"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const GRAY: Color = Color([0x80, 0x80, 0x80]);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// Разбор "#rrggbb", "#rgb" (символ '#' необязателен)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if !digits.is_ascii() {
            return None;
        }
        match digits.len() {
            6 => {
                let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
                let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
                let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
                Some(Self([r, g, b]))
            }
            3 => {
                let mut rgb = [0u8; 3];
                for (i, c) in digits.chars().enumerate() {
                    let v = c.to_digit(16)? as u8;
                    rgb[i] = v * 17;
                }
                Some(Self(rgb))
            }
            _ => None,
        }
    }

    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.0;
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Цвет из 24-битного числа 0xRRGGBB
    pub fn from_u32(value: u32) -> Self {
        Self([(value >> 16) as u8, (value >> 8) as u8, value as u8])
    }

    /// Разбор цвета в CSS-нотации: "#rrggbb", "#rgb", имя ("red"),
    /// "rgb(r, g, b)" / "rgba(...)" и "hsl(h, s%, l%)" / "hsla(...)"
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.starts_with('#') {
            return Self::from_hex(text);
        }
        let lower = text.to_ascii_lowercase();
        if let Some(args) = function_args(&lower, "rgb") {
            let [r, g, b] = args;
            return Some(Self([rgb_channel(r)?, rgb_channel(g)?, rgb_channel(b)?]));
        }
        if let Some([h, s, l]) = function_args(&lower, "hsl") {
            let h = h.trim_end_matches("deg").parse::<f64>().ok()?;
            let s = percent(s)?;
            let l = percent(l)?;
            return Some(Self::from_hsl(h, s, l));
        }
        named_color(&lower).or_else(|| Self::from_hex(&lower))
    }

    /// HSL → RGB; `h` в градусах, `s` и `l` в [0, 1]
    fn from_hsl(h: f64, s: f64, l: f64) -> Self {
        let h = h.rem_euclid(360.0) / 360.0;
        let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        let hue = |t: f64| {
            let t = t.rem_euclid(1.0);
            if t < 1.0 / 6.0 {
                p + (q - p) * 6.0 * t
            } else if t < 0.5 {
                q
            } else if t < 2.0 / 3.0 {
                p + (q - p) * 6.0 * (2.0 / 3.0 - t)
            } else {
                p
            }
        };
        let to_u8 = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self([
            to_u8(hue(h + 1.0 / 3.0)),
            to_u8(hue(h)),
            to_u8(hue(h - 1.0 / 3.0)),
        ])
    }
}

/// Первые три аргумента "name(a, b, c)" или "namea(a, b, c, alpha)"
fn function_args<'a>(text: &'a str, name: &str) -> Option<[&'a str; 3]> {
    let rest = text.strip_prefix(name)?;
    let rest = rest.strip_prefix('a').unwrap_or(rest);
    let inner = rest.trim_start().strip_prefix('(')?.strip_suffix(')')?;
    let mut parts = inner.split(',').map(str::trim);
    let args = [parts.next()?, parts.next()?, parts.next()?];
    let alpha = parts.next();
    (parts.next().is_none() && alpha.map_or(true, |a| !a.is_empty())).then_some(args)
}

fn rgb_channel(arg: &str) -> Option<u8> {
    if let Some(p) = arg.strip_suffix('%') {
        let v = p.trim().parse::<f64>().ok()?;
        return Some((v.clamp(0.0, 100.0) * 2.55).round() as u8);
    }
    let v = arg.parse::<f64>().ok()?;
    v.is_finite().then(|| v.clamp(0.0, 255.0).round() as u8)
}

fn percent(arg: &str) -> Option<f64> {
    let v = arg.strip_suffix('%')?.trim().parse::<f64>().ok()?;
    v.is_finite().then(|| (v / 100.0).clamp(0.0, 1.0))
}

/// Наиболее употребительные именованные цвета CSS
fn named_color(name: &str) -> Option<Color> {
    let value = match name {
        "black" => 0x000000,
        "white" => 0xffffff,
        "red" => 0xff0000,
        "lime" => 0x00ff00,
        "green" => 0x008000,
        "blue" => 0x0000ff,
        "yellow" => 0xffff00,
        "cyan" | "aqua" => 0x00ffff,
        "magenta" | "fuchsia" => 0xff00ff,
        "silver" => 0xc0c0c0,
        "gray" | "grey" => 0x808080,
        "darkgray" | "darkgrey" => 0xa9a9a9,
        "lightgray" | "lightgrey" => 0xd3d3d3,
        "dimgray" | "dimgrey" => 0x696969,
        "maroon" => 0x800000,
        "olive" => 0x808000,
        "purple" => 0x800080,
        "teal" => 0x008080,
        "navy" => 0x000080,
        "orange" => 0xffa500,
        "darkorange" => 0xff8c00,
        "gold" => 0xffd700,
        "pink" => 0xffc0cb,
        "hotpink" => 0xff69b4,
        "brown" => 0xa52a2a,
        "saddlebrown" => 0x8b4513,
        "sienna" => 0xa0522d,
        "chocolate" => 0xd2691e,
        "tan" => 0xd2b48c,
        "beige" => 0xf5f5dc,
        "wheat" => 0xf5deb3,
        "ivory" => 0xfffff0,
        "khaki" => 0xf0e68c,
        "coral" => 0xff7f50,
        "salmon" => 0xfa8072,
        "tomato" => 0xff6347,
        "crimson" => 0xdc143c,
        "firebrick" => 0xb22222,
        "darkred" => 0x8b0000,
        "violet" => 0xee82ee,
        "indigo" => 0x4b0082,
        "orchid" => 0xda70d6,
        "lavender" => 0xe6e6fa,
        "turquoise" => 0x40e0d0,
        "skyblue" => 0x87ceeb,
        "lightblue" => 0xadd8e6,
        "steelblue" => 0x4682b4,
        "royalblue" => 0x4169e1,
        "darkblue" => 0x00008b,
        "forestgreen" => 0x228b22,
        "darkgreen" => 0x006400,
        "lightgreen" => 0x90ee90,
        "seagreen" => 0x2e8b57,
        "olivedrab" => 0x6b8e23,
        "limegreen" => 0x32cd32,
        _ => return None,
    };
    Some(Color::from_u32(value))
}

impl Default for Color {
    fn default() -> Self {
        Color::GRAY
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Color::parse(&text)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color: {text:?}")))
    }
}

/// Цвет из ответа ассистента: нераспознанное значение заменяется серым,
/// чтобы одно поле не отбрасывало весь ответ
fn lenient_color<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    let color = match &value {
        serde_json::Value::String(text) => Color::parse(text),
        serde_json::Value::Number(n) => n
            .as_u64()
            .filter(|v| *v <= 0xFF_FFFF)
            .map(|v| Color::from_u32(v as u32)),
        _ => None,
    };
    Ok(color.unwrap_or_else(|| {
        tracing::warn!("Unrecognized color {}, using gray", value);
        Color::GRAY
    }))
}

// ============================================================================
// Объекты сцены
// ============================================================================

fn default_position() -> Vector3 {
    Vector3::new(0.0, 1.0, 0.0)
}

fn default_scale() -> Vector3 {
    Vector3::ONE
}

fn default_opacity() -> f64 {
    1.0
}

/// Ограничить компоненту масштаба допустимым диапазоном
pub fn clamp_scale(value: f64) -> f64 {
    if value.is_nan() || value < MIN_SCALE {
        MIN_SCALE
    } else if value > MAX_SCALE {
        MAX_SCALE
    } else {
        value
    }
}

/// Ограничить непрозрачность отрезком [0, 1]
pub fn clamp_opacity(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        1.0
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Размещённое в сцене тело
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignObject {
    pub id: ObjectId,
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    pub name: String,
    pub position: Vector3,
    /// Углы Эйлера (радианы), порядок XYZ
    #[serde(default)]
    pub rotation: Vector3,
    #[serde(default = "default_scale")]
    pub scale: Vector3,
    #[serde(default)]
    pub color: Color,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

impl DesignObject {
    /// Новый объект с трансформацией по умолчанию (y = 1, единичный масштаб)
    pub fn new(id: ObjectId, kind: ShapeKind, name: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
            position: Vector3::new(0.0, 1.0, 0.0),
            rotation: Vector3::ZERO,
            scale: Vector3::ONE,
            color: Color::GRAY,
            opacity: 1.0,
        }
    }

    /// Привести поля к допустимым значениям.
    /// Возвращает true, если что-то пришлось исправить.
    pub fn sanitize(&mut self) -> bool {
        let before = (self.position, self.rotation, self.scale, self.opacity);
        self.position = self.position.map(finite_or_zero);
        self.rotation = self.rotation.map(finite_or_zero);
        self.scale = self.scale.map(clamp_scale);
        self.opacity = clamp_opacity(self.opacity);
        // Сравнение через to_bits: NaN != NaN
        let bits = |v: Vector3| v.to_array().map(f64::to_bits);
        bits(before.0) != bits(self.position)
            || bits(before.1) != bits(self.rotation)
            || bits(before.2) != bits(self.scale)
            || before.3.to_bits() != self.opacity.to_bits()
    }

    /// Слить частичное обновление в объект
    pub fn apply(&mut self, patch: &ObjectPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(kind) = &patch.kind {
            self.kind = kind.clone();
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = rotation;
        }
        if let Some(scale) = patch.scale {
            self.scale = scale;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(opacity) = patch.opacity {
            self.opacity = opacity;
        }
        self.sanitize();
    }
}

/// Частичное обновление свойств объекта
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ObjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ShapeKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Vector3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Vector3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<Vector3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl ObjectPatch {
    pub fn position(position: Vector3) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn scale(scale: Vector3) -> Self {
        Self {
            scale: Some(scale),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Описание объекта без идентификатора (ответ AI-сервиса)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectSpec {
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_position")]
    pub position: Vector3,
    #[serde(default)]
    pub rotation: Vector3,
    #[serde(default = "default_scale")]
    pub scale: Vector3,
    #[serde(default, deserialize_with = "lenient_color")]
    pub color: Color,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

impl ObjectSpec {
    /// Превратить описание в объект сцены с заданным идентификатором
    pub fn into_object(self, id: ObjectId) -> DesignObject {
        let name = if self.name.trim().is_empty() {
            self.kind.to_string()
        } else {
            self.name
        };
        let mut object = DesignObject {
            id,
            kind: self.kind,
            name,
            position: self.position,
            rotation: self.rotation,
            scale: self.scale,
            color: self.color,
            opacity: self.opacity,
        };
        object.sanitize();
        object
    }
}

// ============================================================================
// Сцена
// ============================================================================

/// Сцена — упорядоченный список объектов (в JSON — массив)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Scene {
    pub objects: Vec<DesignObject>,
}

impl Scene {
    pub fn new(objects: Vec<DesignObject>) -> Self {
        Self { objects }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&DesignObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut DesignObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.objects.iter().any(|o| o.id == id)
    }

    /// Краткое описание сцены без идентификаторов (для AI-сервиса)
    pub fn summary(&self) -> Vec<SceneSummary> {
        self.objects
            .iter()
            .map(|o| SceneSummary {
                name: o.name.clone(),
                kind: o.kind.clone(),
                position: o.position,
            })
            .collect()
    }
}

/// Элемент краткого описания сцены
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    pub position: Vector3,
}

// ============================================================================
// AI-чат
// ============================================================================

/// AI-запрос от клиента
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiChatRequest {
    pub message: String,
    pub scene: Vec<SceneSummary>,
}

/// AI-ответ — новые объекты + короткое сообщение
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiChatResponse {
    #[serde(default)]
    pub objects: Vec<ObjectSpec>,
    #[serde(default, alias = "text")]
    pub message: String,
}

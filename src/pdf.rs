//! A4 drawing surface over `lopdf`.
//!
//! Fonts, images and transparency states are registered once and shared by
//! every page through the inheritable resources of the page tree.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use lopdf::{
    Dictionary, Document, Object, ObjectId, Stream,
    content::{Content, Operation},
    dictionary,
};
use tracing::debug;

use crate::{
    error::{AssetError, BrandError, Result},
    fonts::{Face, FontFace, FontResolution},
    metrics::{FIRST_CHAR, LAST_CHAR, WidthTable, encode_win_ansi},
    palette::Rgb,
};

/// A4 in points.
pub const PAGE_WIDTH: f32 = 595.2756;
pub const PAGE_HEIGHT: f32 = 841.8898;

struct FontSlot {
    resource: String,
    widths: WidthTable,
}

pub struct Canvas {
    doc: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
    ops: Vec<Operation>,
    fonts: BTreeMap<Face, FontSlot>,
    font_resources: BTreeMap<String, ObjectId>,
    images: BTreeMap<PathBuf, String>,
    xobjects: BTreeMap<String, ObjectId>,
    gstates: BTreeMap<String, ObjectId>,
    font: (Face, f32),
}

impl Canvas {
    pub fn new(fonts: &FontResolution) -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let mut canvas = Canvas {
            doc,
            pages_id,
            page_ids: Vec::new(),
            ops: Vec::new(),
            fonts: BTreeMap::new(),
            font_resources: BTreeMap::new(),
            images: BTreeMap::new(),
            xobjects: BTreeMap::new(),
            gstates: BTreeMap::new(),
            font: (Face::Regular, 10.0),
        };
        canvas.register_face(fonts, Face::Regular);
        canvas.register_face(fonts, Face::Bold);
        canvas
    }

    /// Adds the font object for `face`. Registering a face again keeps the
    /// existing object.
    fn register_face(&mut self, fonts: &FontResolution, face: Face) {
        if self.fonts.contains_key(&face) {
            return;
        }
        let resource = match face {
            Face::Regular => "F1",
            Face::Bold => "F2",
        }
        .to_string();

        let (font_id, widths) = match fonts.face(face) {
            Some(embedded) => (self.embed_truetype(embedded, face), embedded.widths.clone()),
            None => {
                let id = self.doc.add_object(dictionary! {
                    "Type" => "Font",
                    "Subtype" => "Type1",
                    "BaseFont" => Object::Name(fonts.base_name(face).into_bytes()),
                    "Encoding" => "WinAnsiEncoding",
                });
                (id, WidthTable::helvetica(face == Face::Bold))
            }
        };
        self.font_resources.insert(resource.clone(), font_id);
        self.fonts.insert(face, FontSlot { resource, widths });
    }

    fn embed_truetype(&mut self, font: &FontFace, face: Face) -> ObjectId {
        let file_id = self.doc.add_object(Stream::new(
            dictionary! { "Length1" => font.data.len() as i64 },
            font.data.clone(),
        ));
        let stem_v: i64 = if face == Face::Bold { 140 } else { 80 };
        let descriptor_id = self.doc.add_object(dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => Object::Name(font.base_name.clone().into_bytes()),
            "Flags" => 32,
            "FontBBox" => font.bbox.iter().map(|v| Object::Integer(*v)).collect::<Vec<_>>(),
            "ItalicAngle" => 0,
            "Ascent" => font.ascent,
            "Descent" => font.descent,
            "CapHeight" => font.cap_height,
            "StemV" => stem_v,
            "FontFile2" => file_id,
        });
        let widths: Vec<Object> = font
            .widths
            .as_slice()
            .iter()
            .map(|w| Object::Integer(*w as i64))
            .collect();
        self.doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "TrueType",
            "BaseFont" => Object::Name(font.base_name.clone().into_bytes()),
            "FirstChar" => FIRST_CHAR as i64,
            "LastChar" => LAST_CHAR as i64,
            "Widths" => widths,
            "FontDescriptor" => descriptor_id,
            "Encoding" => "WinAnsiEncoding",
        })
    }

    fn op(&mut self, operator: &str, operands: Vec<Object>) {
        self.ops.push(Operation::new(operator, operands));
    }

    pub fn set_fill(&mut self, color: Rgb) {
        let [r, g, b] = color.fractions();
        self.op("rg", vec![r.into(), g.into(), b.into()]);
    }

    pub fn set_stroke(&mut self, color: Rgb) {
        let [r, g, b] = color.fractions();
        self.op("RG", vec![r.into(), g.into(), b.into()]);
    }

    pub fn set_line_width(&mut self, width: f32) {
        self.op("w", vec![width.into()]);
    }

    /// Filled rectangle with its lower-left corner at (x, y).
    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.op("re", vec![x.into(), y.into(), width.into(), height.into()]);
        self.op("f", vec![]);
    }

    /// Filled closed polygon.
    pub fn polygon(&mut self, points: &[(f32, f32)]) {
        let Some(((x0, y0), rest)) = points.split_first() else {
            return;
        };
        self.op("m", vec![(*x0).into(), (*y0).into()]);
        for (x, y) in rest {
            self.op("l", vec![(*x).into(), (*y).into()]);
        }
        self.op("h", vec![]);
        self.op("f", vec![]);
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.op("m", vec![x1.into(), y1.into()]);
        self.op("l", vec![x2.into(), y2.into()]);
        self.op("S", vec![]);
    }

    pub fn save_state(&mut self) {
        self.op("q", vec![]);
    }

    pub fn restore_state(&mut self) {
        self.op("Q", vec![]);
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.op(
            "cm",
            vec![
                1.0f32.into(),
                0.0f32.into(),
                0.0f32.into(),
                1.0f32.into(),
                dx.into(),
                dy.into(),
            ],
        );
    }

    /// Sets fill and stroke opacity, clamped to 0.0..=1.0. Lasts until the
    /// next `restore_state`.
    pub fn set_alpha(&mut self, alpha: f32) {
        let alpha = alpha.clamp(0.0, 1.0);
        let name = format!("GS{}", (alpha * 100.0).round() as u32);
        if !self.gstates.contains_key(&name) {
            let id = self.doc.add_object(dictionary! {
                "Type" => "ExtGState",
                "ca" => alpha,
                "CA" => alpha,
            });
            self.gstates.insert(name.clone(), id);
        }
        self.op("gs", vec![Object::Name(name.into_bytes())]);
    }

    pub fn set_font(&mut self, face: Face, size: f32) {
        self.font = (face, size);
    }

    pub fn string_width(&self, text: &str, face: Face, size: f32) -> f32 {
        self.fonts
            .get(&face)
            .map(|slot| slot.widths.measure(&encode_win_ansi(text), size))
            .unwrap_or(0.0)
    }

    pub fn draw_string(&mut self, x: f32, y: f32, text: &str) {
        let (face, size) = self.font;
        let Some(resource) = self.fonts.get(&face).map(|s| s.resource.clone()) else {
            return;
        };
        self.op("BT", vec![]);
        self.op("Tf", vec![Object::Name(resource.into_bytes()), size.into()]);
        self.op("Td", vec![x.into(), y.into()]);
        self.op("Tj", vec![Object::string_literal(encode_win_ansi(text))]);
        self.op("ET", vec![]);
    }

    pub fn draw_right_string(&mut self, x: f32, y: f32, text: &str) {
        let (face, size) = self.font;
        let width = self.string_width(text, face, size);
        self.draw_string(x - width, y, text);
    }

    pub fn draw_centred_string(&mut self, x: f32, y: f32, text: &str) {
        let (face, size) = self.font;
        let width = self.string_width(text, face, size);
        self.draw_string(x - width / 2.0, y, text);
    }

    /// Draws an image scaled into the given box. The decoded image is
    /// embedded once per path and reused on later calls.
    pub fn draw_image(
        &mut self,
        path: &Path,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> std::result::Result<(), AssetError> {
        let name = match self.images.get(path) {
            Some(name) => name.clone(),
            None => {
                let name = self.embed_image(path)?;
                self.images.insert(path.to_path_buf(), name.clone());
                name
            }
        };
        self.save_state();
        self.op(
            "cm",
            vec![
                width.into(),
                0.0f32.into(),
                0.0f32.into(),
                height.into(),
                x.into(),
                y.into(),
            ],
        );
        self.op("Do", vec![Object::Name(name.into_bytes())]);
        self.restore_state();
        Ok(())
    }

    fn embed_image(&mut self, path: &Path) -> std::result::Result<String, AssetError> {
        let decoded = image::open(path).map_err(|e| AssetError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let rgba = decoded.to_rgba8();
        let (w, h) = rgba.dimensions();

        let pixels = w as usize * h as usize;
        let mut rgb = Vec::with_capacity(pixels * 3);
        let mut alpha = Vec::with_capacity(pixels);
        for px in rgba.pixels() {
            rgb.extend_from_slice(&px.0[..3]);
            alpha.push(px.0[3]);
        }

        let mut image_dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => w as i64,
            "Height" => h as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        };
        if alpha.iter().any(|a| *a != u8::MAX) {
            let mask_id = self.doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => w as i64,
                    "Height" => h as i64,
                    "ColorSpace" => "DeviceGray",
                    "BitsPerComponent" => 8,
                },
                alpha,
            ));
            image_dict.set("SMask", mask_id);
        }
        let image_id = self.doc.add_object(Stream::new(image_dict, rgb));

        let name = format!("Im{}", self.xobjects.len() + 1);
        self.xobjects.insert(name.clone(), image_id);
        debug!(path = %path.display(), width = w, height = h, "embedded image");
        Ok(name)
    }

    /// Ends the current page and starts a new one.
    pub fn show_page(&mut self) -> Result<()> {
        let content = Content {
            operations: std::mem::take(&mut self.ops),
        };
        let encoded = content
            .encode()
            .map_err(|e| BrandError::Pdf(e.to_string()))?;
        let content_id = self.doc.add_object(Stream::new(Dictionary::new(), encoded));
        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "Contents" => content_id,
        });
        self.page_ids.push(page_id);
        Ok(())
    }

    /// Serializes the document. Pending drawing operations become a final
    /// page.
    pub fn into_bytes(mut self) -> Result<Vec<u8>> {
        if !self.ops.is_empty() || self.page_ids.is_empty() {
            self.show_page()?;
        }

        let resources = dictionary! {
            "Font" => names_to_refs(&self.font_resources),
            "XObject" => names_to_refs(&self.xobjects),
            "ExtGState" => names_to_refs(&self.gstates),
        };
        let kids: Vec<Object> = self.page_ids.iter().map(|id| (*id).into()).collect();
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => self.page_ids.len() as i64,
            "Resources" => resources,
            "MediaBox" => vec![
                0.0f32.into(),
                0.0f32.into(),
                PAGE_WIDTH.into(),
                PAGE_HEIGHT.into(),
            ],
        };
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);
        self.doc.compress();

        let mut bytes = Vec::new();
        self.doc
            .save_to(&mut bytes)
            .map_err(|e| BrandError::Pdf(e.to_string()))?;
        Ok(bytes)
    }

    /// Writes the document to `path`. The parent directory must exist.
    pub fn save(self, path: &Path) -> Result<()> {
        let bytes = self.into_bytes()?;
        fs::write(path, &bytes).map_err(|source| BrandError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), bytes = bytes.len(), "wrote PDF");
        Ok(())
    }
}

fn names_to_refs(entries: &BTreeMap<String, ObjectId>) -> Dictionary {
    let mut dict = Dictionary::new();
    for (name, id) in entries {
        dict.set(name.as_str(), *id);
    }
    dict
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::{CustomFamily, stub_face};

    fn sample_canvas(fonts: &FontResolution) -> Canvas {
        let mut canvas = Canvas::new(fonts);
        canvas.set_fill(Rgb::new(0x2B, 0x2D, 0x6E));
        canvas.rect(40.0, 40.0, 100.0, 20.0);
        canvas.set_font(Face::Bold, 18.0);
        canvas.draw_right_string(PAGE_WIDTH - 40.0, PAGE_HEIGHT - 55.0, "Board Resolution");
        canvas.save_state();
        canvas.set_alpha(0.12);
        canvas.polygon(&[(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)]);
        canvas.restore_state();
        canvas
    }

    #[test]
    fn writes_a_loadable_single_page_document() {
        let bytes = sample_canvas(&FontResolution::fallback()).into_bytes().unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn page_breaks_add_pages() {
        let mut canvas = sample_canvas(&FontResolution::fallback());
        canvas.show_page().unwrap();
        canvas.set_font(Face::Regular, 11.0);
        canvas.draw_string(72.0, 700.0, "continued");
        assert_eq!(canvas.page_ids.len(), 1);

        let bytes = canvas.into_bytes().unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn empty_canvas_still_has_a_page() {
        let bytes = Canvas::new(&FontResolution::fallback()).into_bytes().unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn embeds_custom_faces_as_truetype() {
        let fonts = FontResolution::custom(
            "Satoshi",
            CustomFamily {
                regular: stub_face("Satoshi-Regular"),
                bold: stub_face("Satoshi-Bold"),
            },
        );
        let canvas = sample_canvas(&fonts);
        let font_id = canvas.font_resources["F2"];
        let font = canvas.doc.get_dictionary(font_id).unwrap();
        assert_eq!(font.get(b"Subtype").unwrap().as_name().unwrap(), b"TrueType");
        assert_eq!(font.get(b"BaseFont").unwrap().as_name().unwrap(), b"Satoshi-Bold");

        let descriptor_id = font.get(b"FontDescriptor").unwrap().as_reference().unwrap();
        let descriptor = canvas.doc.get_dictionary(descriptor_id).unwrap();
        let bbox: Vec<i64> = descriptor
            .get(b"FontBBox")
            .unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_i64().unwrap())
            .collect();
        assert_eq!(bbox, vec![-100, -250, 1000, 750]);
        assert_eq!(descriptor.get(b"CapHeight").unwrap().as_i64().unwrap(), 700);
    }

    #[test]
    fn fallback_faces_use_builtin_helvetica() {
        let canvas = Canvas::new(&FontResolution::fallback());
        let font_id = canvas.font_resources["F1"];
        let font = canvas.doc.get_dictionary(font_id).unwrap();
        assert_eq!(font.get(b"Subtype").unwrap().as_name().unwrap(), b"Type1");
        assert_eq!(font.get(b"BaseFont").unwrap().as_name().unwrap(), b"Helvetica");
    }

    #[test]
    fn registering_a_face_twice_keeps_the_first_object() {
        let fonts = FontResolution::fallback();
        let mut canvas = Canvas::new(&fonts);
        let before = canvas.font_resources.clone();
        canvas.register_face(&fonts, Face::Regular);
        canvas.register_face(&fonts, Face::Bold);
        assert_eq!(canvas.font_resources, before);
    }

    #[test]
    fn alpha_states_are_shared() {
        let mut canvas = Canvas::new(&FontResolution::fallback());
        canvas.set_alpha(0.04);
        canvas.set_alpha(0.04);
        canvas.set_alpha(7.0);
        assert_eq!(canvas.gstates.len(), 2);
        assert!(canvas.gstates.contains_key("GS100"));
    }

    #[test]
    fn missing_image_is_an_asset_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut canvas = Canvas::new(&FontResolution::fallback());
        let err = canvas
            .draw_image(&dir.path().join("logo.png"), 0.0, 0.0, 10.0, 10.0)
            .unwrap_err();
        assert!(err.to_string().contains("logo.png"));
        assert!(canvas.xobjects.is_empty());
    }

    #[test]
    fn embeds_png_with_alpha_mask() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mark.png");
        let mut img = image::RgbaImage::new(2, 2);
        img.put_pixel(0, 0, image::Rgba([10, 20, 30, 0]));
        img.save(&path).unwrap();

        let mut canvas = Canvas::new(&FontResolution::fallback());
        canvas.draw_image(&path, 0.0, 0.0, 10.0, 10.0).unwrap();
        canvas.draw_image(&path, 20.0, 0.0, 10.0, 10.0).unwrap();
        assert_eq!(canvas.xobjects.len(), 1);

        let image_id = canvas.xobjects["Im1"];
        let stream = canvas.doc.get_object(image_id).unwrap().as_stream().unwrap();
        assert!(stream.dict.get(b"SMask").is_ok());
    }

    #[test]
    fn save_fails_when_parent_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.pdf");
        let err = Canvas::new(&FontResolution::fallback())
            .save(&path)
            .unwrap_err();
        assert!(matches!(err, BrandError::Io { .. }), "unexpected: {err:?}");
        assert!(!path.exists());
    }
}

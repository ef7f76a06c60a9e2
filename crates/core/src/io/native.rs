//! Native GeoTIFF reading/writing built on the `tiff` crate
//!
//! Supports the subset of GeoTIFF a DEM workflow needs: a single band,
//! north-up georeferencing (ModelPixelScale + ModelTiepoint), the GDAL
//! no-data tag and the EPSG code from the GeoKey directory.

use crate::crs::CRS;
use crate::error::{Error, Result};
use crate::raster::{GeoTransform, Raster, RasterElement};
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Read, Seek, Write};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::Gray32Float;
use tiff::encoder::TiffEncoder;
use tiff::tags::Tag;

const MODEL_PIXEL_SCALE: u16 = 33550;
const MODEL_TIEPOINT: u16 = 33922;
const GEO_KEY_DIRECTORY: u16 = 34735;
const GDAL_NODATA: u16 = 42113;

const GT_MODEL_TYPE_KEY: u32 = 1024;
const GT_RASTER_TYPE_KEY: u32 = 1025;
const GEOGRAPHIC_TYPE_KEY: u32 = 2048;
const PROJECTED_CS_TYPE_KEY: u32 = 3072;

/// Canonical tag for a numeric code; the decoder keys its directory by the
/// named variant when `tiff` knows the tag, so `Tag::Unknown` would miss it.
fn geo_tag(code: u16) -> Tag {
    Tag::from_u16_exhaustive(code)
}

/// Options for writing GeoTIFF files
#[derive(Debug, Clone, Default)]
pub struct GeoTiffOptions {
    /// Omit the EPSG GeoKey even when the raster carries a CRS
    pub skip_crs: bool,
}

/// Read a GeoTIFF file into a Raster
pub fn read_geotiff<T, P>(path: P, band: Option<usize>) -> Result<Raster<T>>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref())?;
    decode_geotiff(BufReader::new(file), band)
}

/// Read a GeoTIFF from an in-memory buffer into a Raster
pub fn read_geotiff_from_buffer<T>(data: &[u8], band: Option<usize>) -> Result<Raster<T>>
where
    T: RasterElement,
{
    decode_geotiff(Cursor::new(data), band)
}

fn cast_all<S, T>(buf: Vec<S>) -> Vec<T>
where
    S: num_traits::NumCast + Copy,
    T: RasterElement,
{
    buf.into_iter()
        .map(|v| num_traits::cast(v).unwrap_or_else(T::default_nodata))
        .collect()
}

fn decode_geotiff<T, R>(reader: R, band: Option<usize>) -> Result<Raster<T>>
where
    T: RasterElement,
    R: Read + Seek,
{
    if band.is_some_and(|b| b > 1) {
        return Err(Error::UnsupportedDataType(
            "only single-band GeoTIFFs are supported".to_string(),
        ));
    }

    let mut decoder = Decoder::new(reader)?;
    let (width, height) = decoder.dimensions()?;
    let rows = height as usize;
    let cols = width as usize;

    let data: Vec<T> = match decoder.read_image()? {
        DecodingResult::F32(buf) => cast_all(buf),
        DecodingResult::F64(buf) => cast_all(buf),
        DecodingResult::U8(buf) => cast_all(buf),
        DecodingResult::U16(buf) => cast_all(buf),
        DecodingResult::U32(buf) => cast_all(buf),
        DecodingResult::I8(buf) => cast_all(buf),
        DecodingResult::I16(buf) => cast_all(buf),
        DecodingResult::I32(buf) => cast_all(buf),
        _ => {
            return Err(Error::UnsupportedDataType(
                "unsupported TIFF sample format".to_string(),
            ));
        }
    };

    let mut raster = Raster::from_vec(data, rows, cols)?;

    match read_geotransform(&mut decoder) {
        Some(transform) => raster.set_transform(transform),
        None => tracing::debug!("no georeferencing tags found, using identity transform"),
    }

    if let Some(nodata) = read_nodata(&mut decoder) {
        raster.set_nodata(Some(T::from_f64(nodata)));
    }

    raster.set_crs(read_epsg(&mut decoder).map(CRS::from_epsg));

    Ok(raster)
}

fn read_geotransform<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<GeoTransform> {
    let scale = decoder.get_tag_f64_vec(geo_tag(MODEL_PIXEL_SCALE)).ok()?;
    let tiepoint = decoder.get_tag_f64_vec(geo_tag(MODEL_TIEPOINT)).ok()?;

    if scale.len() < 2 || tiepoint.len() < 6 {
        return None;
    }

    // tiepoint: [I, J, K, X, Y, Z]; scale: [ScaleX, ScaleY, ScaleZ]
    let origin_x = tiepoint[3] - tiepoint[0] * scale[0];
    let origin_y = tiepoint[4] + tiepoint[1] * scale[1];

    Some(GeoTransform::new(origin_x, origin_y, scale[0], -scale[1]))
}

fn read_nodata<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<f64> {
    let text = decoder.get_tag_ascii_string(geo_tag(GDAL_NODATA)).ok()?;
    text.trim_matches(|c: char| c == '\0' || c.is_whitespace())
        .parse()
        .ok()
}

/// EPSG code from the GeoKey directory (projected key wins over geographic)
fn read_epsg<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<u32> {
    let keys = decoder.get_tag_u32_vec(geo_tag(GEO_KEY_DIRECTORY)).ok()?;

    // Header: version, revision, minor, key count; then 4 shorts per key.
    let count = *keys.get(3)? as usize;
    let entries = keys.get(4..4 + count * 4)?;

    let inline_value = |wanted: u32| {
        entries
            .chunks_exact(4)
            .find(|e| e[0] == wanted && e[1] == 0)
            .map(|e| e[3])
    };

    inline_value(PROJECTED_CS_TYPE_KEY)
        .or_else(|| inline_value(GEOGRAPHIC_TYPE_KEY))
        .filter(|&code| code != 0 && code != 32767)
}

/// Write a Raster to a GeoTIFF file (32-bit float samples)
pub fn write_geotiff<T, P>(raster: &Raster<T>, path: P, options: Option<GeoTiffOptions>) -> Result<()>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let file = File::create(path.as_ref())?;
    encode_geotiff(raster, BufWriter::new(file), &options.unwrap_or_default())
}

/// Write a Raster to an in-memory GeoTIFF buffer
pub fn write_geotiff_to_buffer<T>(raster: &Raster<T>, options: Option<GeoTiffOptions>) -> Result<Vec<u8>>
where
    T: RasterElement,
{
    let mut buf = Vec::new();
    encode_geotiff(raster, Cursor::new(&mut buf), &options.unwrap_or_default())?;
    Ok(buf)
}

fn encode_geotiff<T, W>(raster: &Raster<T>, writer: W, options: &GeoTiffOptions) -> Result<()>
where
    T: RasterElement,
    W: Write + Seek,
{
    let mut encoder = TiffEncoder::new(writer)?;
    let (rows, cols) = raster.shape();

    let data: Vec<f32> = raster
        .data()
        .iter()
        .map(|&v| num_traits::cast(v).unwrap_or(f32::NAN))
        .collect();

    let mut image = encoder.new_image::<Gray32Float>(cols as u32, rows as u32)?;

    let gt = raster.transform();
    let scale = [gt.pixel_width, gt.pixel_height.abs(), 0.0];
    image.encoder().write_tag(geo_tag(MODEL_PIXEL_SCALE), &scale[..])?;

    let tiepoint = [0.0, 0.0, 0.0, gt.origin_x, gt.origin_y, 0.0];
    image.encoder().write_tag(geo_tag(MODEL_TIEPOINT), &tiepoint[..])?;

    let crs = raster.crs().filter(|_| !options.skip_crs);
    let geokeys = geokey_directory(crs);
    image.encoder().write_tag(geo_tag(GEO_KEY_DIRECTORY), &geokeys[..])?;

    if let Some(nodata) = raster.nodata().and_then(|v| v.to_f64()) {
        let text = if nodata.is_nan() { "nan".to_string() } else { nodata.to_string() };
        image.encoder().write_tag(geo_tag(GDAL_NODATA), text.as_str())?;
    }

    image.write_data(&data)?;
    Ok(())
}

fn geokey_directory(crs: Option<&CRS>) -> Vec<u16> {
    let epsg = crs.and_then(|c| c.epsg().map(|code| (code, c.is_geographic())));

    // GTModelType: 1 = projected, 2 = geographic. GTRasterType 1 = PixelIsArea.
    let model_type = if epsg.is_some_and(|(_, geographic)| geographic) { 2 } else { 1 };

    let mut keys: Vec<u16> = vec![
        1, 1, 0, 2,
        GT_MODEL_TYPE_KEY as u16, 0, 1, model_type,
        GT_RASTER_TYPE_KEY as u16, 0, 1, 1,
    ];

    if let Some((code, geographic)) = epsg.filter(|(code, _)| *code <= u16::MAX as u32) {
        let key = if geographic { GEOGRAPHIC_TYPE_KEY } else { PROJECTED_CS_TYPE_KEY };
        keys.extend_from_slice(&[key as u16, 0, 1, code as u16]);
        keys[3] = 3;
    }

    keys
}

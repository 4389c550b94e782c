use std::{
    collections::{BTreeMap, btree_map::Entry},
    fs::{self, File},
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};

use geojson::{FeatureReader, FeatureWriter, JsonObject, Value};
use tracing::{debug, info};

use crate::{
    error::{Result, SieveError},
    feature::{Feature, Table},
    traits::{FeatureIter, Source, Target},
    types::{Coordinate, Geometry, Polygon},
};

const EXTENSIONS: [&str; 2] = ["geojson", "json"];

fn position_to_coordinate(position: &[f64]) -> Result<Coordinate> {
    match position {
        [x, y, ..] => Ok([*x, *y]),
        _ => Err(SieveError::InvalidGeometry(format!(
            "position needs at least 2 ordinates, got {}",
            position.len()
        ))),
    }
}

fn polygon_from_rings(rings: &[Vec<Vec<f64>>]) -> Result<Polygon> {
    rings
        .iter()
        .map(|ring| ring.iter().map(|position| position_to_coordinate(position)).collect())
        .collect()
}

fn polygon_to_rings(polygon: &Polygon) -> Vec<Vec<Vec<f64>>> {
    polygon
        .iter()
        .map(|ring| ring.iter().map(|&[x, y]| vec![x, y]).collect())
        .collect()
}

/// Convert a GeoJSON geometry value into a sieve geometry.
///
/// Polygons, multi-polygons and points map onto their own variants; every
/// other geometry type is carried as `Geometry::Other`.
pub fn geometry_from_value(value: Value) -> Result<Geometry> {
    match value {
        Value::Polygon(rings) => Ok(Geometry::Polygon(polygon_from_rings(&rings)?)),
        Value::MultiPolygon(polygons) => Ok(Geometry::MultiPolygon(
            polygons
                .iter()
                .map(|rings| polygon_from_rings(rings))
                .collect::<Result<_>>()?,
        )),
        Value::Point(position) => Ok(Geometry::Point(position_to_coordinate(&position)?)),
        other => Ok(Geometry::Other(geo_types::Geometry::<f64>::try_from(other)?)),
    }
}

/// Convert a sieve geometry back into a GeoJSON geometry value.
///
/// Single-point polygons produced by centroid substitution are written as a
/// polygon with a one-position ring.
pub fn geometry_to_value(geometry: &Geometry) -> Value {
    match geometry {
        Geometry::Polygon(polygon) => Value::Polygon(polygon_to_rings(polygon)),
        Geometry::MultiPolygon(members) => Value::MultiPolygon(members.iter().map(polygon_to_rings).collect()),
        Geometry::Point([x, y]) => Value::Point(vec![*x, *y]),
        Geometry::Other(geometry) => Value::from(geometry),
    }
}

/// Build a sieve feature from a GeoJSON feature, ordering its properties by `columns`
pub fn feature_from_geojson(feature: geojson::Feature, columns: &[String]) -> Result<Feature> {
    let mut properties = feature.properties.unwrap_or_default();
    let values = columns
        .iter()
        .map(|column| properties.remove(column).unwrap_or(serde_json::Value::Null))
        .collect();
    let geometry = feature
        .geometry
        .map(|geometry| geometry_from_value(geometry.value))
        .transpose()?;

    Ok(Feature::new(values, geometry))
}

/// Build a GeoJSON feature from a sieve feature, naming its values by `columns`
pub fn feature_to_geojson(feature: &Feature, columns: &[String]) -> geojson::Feature {
    let properties: JsonObject = columns
        .iter()
        .cloned()
        .zip(feature.columns().iter().cloned())
        .collect();

    geojson::Feature {
        bbox: None,
        geometry: feature.geometry().map(|geometry| geojson::Geometry::new(geometry_to_value(geometry))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn open_features(
    path: &Path,
) -> Result<impl Iterator<Item = geojson::Result<geojson::Feature>> + Send + use<>> {
    let file = File::open(path)?;
    Ok(FeatureReader::from_reader(BufReader::new(file)).features())
}

fn has_geojson_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

fn table_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "features".to_string())
}

/// A dataset made of GeoJSON FeatureCollections.
///
/// A single file is one table; a directory holds one table per `.geojson` or
/// `.json` file, named after the file stem. Two files sharing a stem are
/// rejected since both would map onto the same table and output file.
///
/// Features are streamed from disk one at a time.
#[derive(Debug, Clone)]
pub struct GeoJsonSource {
    files: BTreeMap<String, PathBuf>,
}

impl GeoJsonSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SieveError::SourceNotFound(path.to_path_buf()));
        }

        let mut files = BTreeMap::new();
        if path.is_dir() {
            for entry in fs::read_dir(path)? {
                let file = entry?.path();
                if !(file.is_file() && has_geojson_extension(&file)) {
                    continue;
                }
                match files.entry(table_name(&file)) {
                    Entry::Vacant(slot) => {
                        slot.insert(file);
                    }
                    Entry::Occupied(slot) => {
                        return Err(SieveError::DuplicateTable {
                            name: slot.key().clone(),
                            first: slot.get().clone(),
                            second: file,
                        });
                    }
                }
            }
        } else {
            files.insert(table_name(path), path.to_path_buf());
        }

        debug!(tables = files.len(), "opened GeoJSON source {}", path.display());
        Ok(Self { files })
    }

    fn table_path(&self, name: &str) -> Result<&Path> {
        self.files
            .get(name)
            .map(PathBuf::as_path)
            .ok_or_else(|| SieveError::UnknownTable(name.to_string()))
    }
}

impl Source for GeoJsonSource {
    fn tables(&self) -> Result<Vec<Table>> {
        let mut tables = Vec::with_capacity(self.files.len());
        for (name, path) in &self.files {
            let mut columns: Vec<String> = Vec::new();
            for feature in open_features(path)? {
                let Some(properties) = feature?.properties else {
                    continue;
                };
                for (key, _) in properties {
                    if !columns.contains(&key) {
                        columns.push(key);
                    }
                }
            }
            tables.push(Table::new(name.clone(), columns));
        }
        Ok(tables)
    }

    fn read_features<'a>(&'a mut self, table: &Table) -> Result<FeatureIter<'a>> {
        let features = open_features(self.table_path(&table.name)?)?;
        let columns = table.columns.clone();

        Ok(Box::new(features.map(move |feature| {
            feature_from_geojson(feature?, &columns)
        })))
    }
}

struct TableWriter {
    table: String,
    out: FeatureWriter<BufWriter<File>>,
    written: u64,
}

/// Writes each table as a GeoJSON FeatureCollection into a directory.
///
/// Every page is flushed to disk as soon as it is written.
pub struct GeoJsonTarget {
    dir: PathBuf,
    page_size: usize,
    memory_limit: Option<f64>,
    current: Option<TableWriter>,
}

impl GeoJsonTarget {
    pub fn new<P: Into<PathBuf>>(dir: P, page_size: usize) -> Self {
        Self {
            dir: dir.into(),
            page_size,
            memory_limit: None,
            current: None,
        }
    }

    pub fn with_memory_limit(mut self, megabytes: Option<f64>) -> Self {
        self.memory_limit = megabytes;
        self
    }

    /// Output file of a table
    pub fn table_path(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{}.geojson", table))
    }

    fn writer_for(&mut self, table: &Table) -> Result<&mut TableWriter> {
        match self.current.as_mut() {
            Some(writer) if writer.table == table.name => Ok(writer),
            _ => Err(SieveError::TableNotStarted(table.name.clone())),
        }
    }
}

impl Target for GeoJsonTarget {
    fn init(&mut self, tables: &[Table]) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        for table in tables {
            let path = self.table_path(&table.name);
            File::create(&path)?;
            debug!(table = %table.name, "created {}", path.display());
        }
        Ok(())
    }

    fn page_size(&self) -> usize {
        self.page_size
    }

    fn memory_limit(&self) -> Option<f64> {
        self.memory_limit
    }

    fn begin_table(&mut self, table: &Table) -> Result<()> {
        let file = File::create(self.table_path(&table.name))?;
        self.current = Some(TableWriter {
            table: table.name.clone(),
            out: FeatureWriter::from_writer(BufWriter::new(file)),
            written: 0,
        });
        Ok(())
    }

    fn write_page(&mut self, table: &Table, page: Vec<Feature>) -> Result<()> {
        let writer = self.writer_for(table)?;
        for feature in &page {
            writer.out.write_feature(&feature_to_geojson(feature, &table.columns))?;
            writer.written += 1;
        }
        writer.out.flush()?;
        Ok(())
    }

    fn finish_table(&mut self, table: &Table) -> Result<()> {
        let path = self.table_path(&table.name);
        let writer = self.writer_for(table)?;
        writer.out.finish()?;
        writer.out.flush()?;
        info!(table = %table.name, features = writer.written, "wrote {}", path.display());
        self.current = None;
        Ok(())
    }
}

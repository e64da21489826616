//! Tabular inventory report with a summary section, serialized as CSV.

use rackscan_core::{Category, ClassifiedObject, Inventory, RackColor};
use serde::Serialize;
use std::borrow::Cow;
use std::fmt::Write as _;

pub const HEADERS: [&str; 6] = [
    "object_type",
    "object_id",
    "coordinates",
    "width",
    "height",
    "rotation",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub object_type: String,
    pub object_id: String,
    pub coordinates: String,
    pub width: String,
    pub height: String,
    pub rotation: String,
}

impl ReportRow {
    fn cells(&self) -> [&str; 6] {
        [
            &self.object_type,
            &self.object_id,
            &self.coordinates,
            &self.width,
            &self.height,
            &self.rotation,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub rows: Vec<ReportRow>,
    /// `(metric, value)` pairs.
    pub summary: Vec<(String, String)>,
}

/// `server_rack_red`, `cooling_tile`, ...
pub fn object_type(obj: &ClassifiedObject) -> String {
    let base = obj.category.slug().replace('-', "_");
    match obj.rack_color() {
        Some(color) => format!("{base}_{}", color.as_str()),
        None => base,
    }
}

pub fn build_report(inventory: &Inventory) -> Report {
    let mut rows = Vec::new();
    for category in Category::ALL {
        for (i, obj) in inventory.objects(category).iter().enumerate() {
            rows.push(ReportRow {
                object_type: object_type(obj),
                object_id: obj.id(i),
                coordinates: format!("({:.2}, {:.2})", obj.x, obj.y),
                width: format!("{:.2}", obj.width),
                height: format!("{:.2}", obj.height),
                rotation: match obj.rotation_degrees() {
                    Some(r) => format!("{r:.1}°"),
                    None => "N/A".to_string(),
                },
            });
        }
    }
    Report {
        rows,
        summary: summary(inventory),
    }
}

fn summary(inventory: &Inventory) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for category in Category::ALL {
        if category == Category::Other {
            continue;
        }
        out.push((
            format!("Total {}", category.label()),
            inventory.objects(category).len().to_string(),
        ));
    }

    let racks = inventory.objects(Category::ServerRack);
    for color in [RackColor::Red, RackColor::Gray] {
        let n = racks
            .iter()
            .filter(|r| r.rack_color() == Some(color))
            .count();
        out.push((format!("{} racks", capitalize(color.as_str())), n.to_string()));
    }

    for category in Category::ALL {
        let objs = inventory.objects(category);
        if objs.is_empty() {
            continue;
        }
        let (x_min, x_max) = range(objs.iter().map(|o| o.x));
        let (y_min, y_max) = range(objs.iter().map(|o| o.y));
        let n = objs.len() as f64;
        let avg_w = objs.iter().map(|o| o.width).sum::<f64>() / n;
        let avg_h = objs.iter().map(|o| o.height).sum::<f64>() / n;
        let label = category.label();
        out.push((
            format!("{label} X range"),
            format!("{x_min:.2} to {x_max:.2}"),
        ));
        out.push((
            format!("{label} Y range"),
            format!("{y_min:.2} to {y_max:.2}"),
        ));
        out.push((
            format!("{label} average size"),
            format!("{avg_w:.2} x {avg_h:.2}"),
        ));
    }
    out
}

fn range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

fn capitalize(s: &str) -> String {
    let mut cs = s.chars();
    match cs.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + cs.as_str(),
        None => String::new(),
    }
}

fn csv_field(s: &str) -> Cow<'_, str> {
    if s.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", s.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(s)
    }
}

fn write_record<'a>(
    out: &mut String,
    cells: impl IntoIterator<Item = &'a str>,
) -> std::fmt::Result {
    let line: Vec<Cow<'_, str>> = cells.into_iter().map(csv_field).collect();
    writeln!(out, "{}", line.join(","))
}

impl Report {
    /// RFC 4180 CSV: the object table, a blank line, then `metric,value` summary rows.
    pub fn to_csv(&self) -> crate::Result<String> {
        let mut out = String::new();
        write_record(&mut out, HEADERS)?;
        for row in &self.rows {
            write_record(&mut out, row.cells())?;
        }
        out.push('\n');
        write_record(&mut out, ["metric", "value"])?;
        for (metric, value) in &self.summary {
            write_record(&mut out, [metric.as_str(), value.as_str()])?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rackscan_core::{CategoryExtra, NodeId, ShapeTree, build_inventory};

    fn inventory() -> Inventory {
        let tree = ShapeTree::parse(
            r#"<svg xmlns="http://www.w3.org/2000/svg">
                 <g fill="rgb(230,0,0)"><line/><path d="M0,0 L10,0 L10,30 Z"/></g>
                 <g fill="rgb(110,110,110)" transform="translate(20,0)"><line/><path d="M0,0 L10,0 L10,30 Z"/></g>
                 <g transform="translate(5,5) rotate(90)">
                   <g fill="black" fill-opacity="0.6"><path d="M0,0 L4,0 A4,4 0 0,1 0,4 Z"/></g>
                 </g>
               </svg>"#,
        )
        .unwrap();
        build_inventory(&tree, &Default::default())
    }

    #[test]
    fn rows_carry_types_ids_and_formatted_values() {
        let report = build_report(&inventory());
        let rack = report
            .rows
            .iter()
            .find(|r| r.object_type == "server_rack_gray")
            .unwrap();
        assert_eq!(rack.object_id, "server-rack-1");
        assert_eq!(rack.coordinates, "(20.00, 0.00)");
        assert_eq!(rack.width, "10.00");
        assert_eq!(rack.height, "30.00");
        assert_eq!(rack.rotation, "N/A");

        let door = report.rows.iter().find(|r| r.object_type == "door").unwrap();
        assert_eq!(door.rotation, "90.0°");
        assert_eq!(door.coordinates, "(5.00, 5.00)");
    }

    #[test]
    fn summary_counts_and_ranges() {
        let report = build_report(&inventory());
        let get = |k: &str| {
            report
                .summary
                .iter()
                .find(|(m, _)| m == k)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("Total Server Racks"), Some("2"));
        assert_eq!(get("Total Doors"), Some("1"));
        assert_eq!(get("Total Walls"), Some("0"));
        assert_eq!(get("Red racks"), Some("1"));
        assert_eq!(get("Gray racks"), Some("1"));
        assert_eq!(get("Server Racks X range"), Some("0.00 to 20.00"));
        assert_eq!(get("Server Racks average size"), Some("10.00 x 30.00"));
        assert_eq!(get("Walls X range"), None);
    }

    #[test]
    fn csv_quotes_fields_with_commas() {
        let report = Report {
            rows: vec![ReportRow {
                object_type: "wall".to_string(),
                object_id: "wall-0".to_string(),
                coordinates: "(1.00, 2.00)".to_string(),
                width: "3.00".to_string(),
                height: "4.00".to_string(),
                rotation: "N/A".to_string(),
            }],
            summary: vec![("Total \"Walls\"".to_string(), "1".to_string())],
        };
        let csv = report.to_csv().unwrap();
        assert_eq!(
            csv,
            "object_type,object_id,coordinates,width,height,rotation\n\
             wall,wall-0,\"(1.00, 2.00)\",3.00,4.00,N/A\n\
             \n\
             metric,value\n\
             \"Total \"\"Walls\"\"\",1\n"
        );
    }

    #[test]
    fn object_type_includes_rack_color() {
        let obj = ClassifiedObject {
            category: Category::ServerRack,
            node: NodeId::ROOT,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            extra: CategoryExtra::Rack {
                color: RackColor::Red,
            },
        };
        assert_eq!(object_type(&obj), "server_rack_red");
    }
}

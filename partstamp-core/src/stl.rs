/// STL file parser for binary and ASCII formats
use nalgebra::{Point3, Vector3};
use nom::{
    bytes::complete::tag,
    character::complete::{multispace0, multispace1, not_line_ending},
    multi::many0,
    number::complete::float,
    sequence::preceded,
    IResult,
};
use thiserror::Error;

use crate::geometry::{Mesh, Triangle};

#[derive(Debug, Error, PartialEq)]
pub enum StlError {
    #[error("file too small to be a valid STL ({0} bytes)")]
    TooShort(usize),
    #[error("unexpected end of file while reading facet {0}")]
    UnexpectedEof(usize),
    #[error("failed to parse ASCII STL: {0}")]
    Ascii(String),
}

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<Mesh, StlError> {
    if data.len() < 84 {
        return Err(StlError::TooShort(data.len()));
    }

    // Skip 80-byte header
    let data = &data[80..];

    // Read triangle count (4 bytes, little-endian)
    let triangle_count = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;

    let mut mesh = Mesh::with_capacity(triangle_count);
    let mut offset = 4;

    for facet in 0..triangle_count {
        if offset + 50 > data.len() {
            return Err(StlError::UnexpectedEof(facet));
        }

        let normal = Vector3::new(
            read_f32(data, offset),
            read_f32(data, offset + 4),
            read_f32(data, offset + 8),
        );
        offset += 12;

        let mut vertices = [Point3::origin(); 3];
        for vertex in &mut vertices {
            *vertex = Point3::new(
                read_f32(data, offset),
                read_f32(data, offset + 4),
                read_f32(data, offset + 8),
            );
            offset += 12;
        }

        // Skip attribute byte count (2 bytes)
        offset += 2;

        mesh.add_triangle(Triangle::with_normal(
            vertices[0],
            vertices[1],
            vertices[2],
            normal,
        ));
    }

    log::debug!("parsed binary STL with {} triangles", mesh.triangles.len());
    Ok(mesh)
}

fn read_f32(data: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<Mesh, StlError> {
    match parse_ascii_stl_impl(input) {
        Ok((_, mesh)) => {
            log::debug!("parsed ASCII STL with {} triangles", mesh.triangles.len());
            Ok(mesh)
        }
        Err(e) => Err(StlError::Ascii(format!("{e:?}"))),
    }
}

fn parse_ascii_stl_impl(input: &str) -> IResult<&str, Mesh> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    // Optional solid name, rest of the first line
    let (input, _) = not_line_ending(input)?;
    let (input, triangles) = many0(parse_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;

    let mut mesh = Mesh::with_capacity(triangles.len());
    for triangle in triangles {
        mesh.add_triangle(triangle);
    }

    Ok((input, mesh))
}

fn parse_facet(input: &str) -> IResult<&str, Triangle> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, normal) = parse_vector3(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, v0) = parse_vertex(input)?;
    let (input, v1) = parse_vertex(input)?;
    let (input, v2) = parse_vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;

    let normal = Vector3::new(normal.0, normal.1, normal.2);
    Ok((input, Triangle::with_normal(v0, v1, v2, normal)))
}

fn parse_vertex(input: &str) -> IResult<&str, Point3<f32>> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    let (input, (x, y, z)) = parse_vector3(input)?;
    Ok((input, Point3::new(x, y, z)))
}

fn parse_vector3(input: &str) -> IResult<&str, (f32, f32, f32)> {
    let (input, _) = multispace0(input)?;
    let (input, x) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = float(input)?;
    Ok((input, (x, y, z)))
}

/// Detect and parse STL file (binary or ASCII)
pub fn parse_stl(data: &[u8]) -> Result<Mesh, StlError> {
    // Try to detect format
    if data.len() > 5 && &data[0..5] == b"solid" {
        // Might be ASCII
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok(mesh) = parse_ascii_stl(text) {
                return Ok(mesh);
            }
        }
    }

    // Try binary format
    parse_binary_stl(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASCII_TRIANGLE: &str = "solid test
facet normal 0 0 1
  outer loop
    vertex 0 0 0
    vertex 1 0 0
    vertex 0 1 0
  endloop
endfacet
endsolid test
";

    fn binary_triangle() -> Vec<u8> {
        let mut data = vec![0u8; 80];
        data.extend_from_slice(&1u32.to_le_bytes());
        // Normal
        for value in [0.0f32, 0.0, 1.0] {
            data.extend_from_slice(&value.to_le_bytes());
        }
        // Vertices
        for vertex in [[0.0f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]] {
            for value in vertex {
                data.extend_from_slice(&value.to_le_bytes());
            }
        }
        // Attribute byte count
        data.extend_from_slice(&0u16.to_le_bytes());
        data
    }

    #[test]
    fn test_parse_binary_header() {
        let mut data = vec![0u8; 84];
        data[80..84].copy_from_slice(&0u32.to_le_bytes());

        let mesh = parse_binary_stl(&data).unwrap();
        assert_eq!(mesh.triangles.len(), 0);
    }

    #[test]
    fn test_parse_binary_triangle() {
        let mesh = parse_binary_stl(&binary_triangle()).unwrap();
        assert_eq!(mesh.triangles.len(), 1);
        let triangle = &mesh.triangles[0];
        assert_eq!(triangle.vertices[1], Point3::new(1.0, 0.0, 0.0));
        assert_eq!(triangle.normal, Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_binary_too_short() {
        assert_eq!(
            parse_binary_stl(&[0u8; 10]).unwrap_err(),
            StlError::TooShort(10)
        );
    }

    #[test]
    fn test_binary_truncated_facet() {
        let mut data = binary_triangle();
        data.truncate(data.len() - 10);
        assert_eq!(parse_binary_stl(&data).unwrap_err(), StlError::UnexpectedEof(0));
    }

    #[test]
    fn test_parse_ascii_triangle() {
        let mesh = parse_ascii_stl(ASCII_TRIANGLE).unwrap();
        assert_eq!(mesh.triangles.len(), 1);
        assert_eq!(mesh.triangles[0].vertices[2], Point3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_autodetect_formats() {
        assert_eq!(
            parse_stl(ASCII_TRIANGLE.as_bytes()).unwrap().triangles.len(),
            1
        );
        assert_eq!(parse_stl(&binary_triangle()).unwrap().triangles.len(), 1);
    }
}

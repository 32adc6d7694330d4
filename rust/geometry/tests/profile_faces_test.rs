// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Profile and face properties that must hold for every element family.

use approx::assert_relative_eq;
use rebar_lite_geometry::{
    build_profile, derive_faces, parse_descriptor, Dimensions, Plane, Point3, Profile,
    ProfileFamily, Vector3,
};

const DESCRIPTORS: &[&str] = &[
    "FTG600*2400",
    "LDG400*300*200",
    "COL500*500",
    "RW3000*900*400*350*250*20",
    "RW3000*900*400*350*250*20*150",
    "TW1800*350*900",
    "WW2500*400*1800*900*2000",
];

fn skewed_frame() -> Plane {
    Plane::new(
        Point3::new(250.0, -120.0, 40.0),
        Vector3::new(1.0, 1.0, 0.0),
        Vector3::new(-1.0, 1.0, 0.2),
    )
    .unwrap()
}

#[test]
fn every_family_yields_consistent_stations_and_faces() {
    for descriptor in DESCRIPTORS {
        let (family, dims) = parse_descriptor(descriptor).unwrap();
        for stations in [2, 3] {
            if !family.supports_stations(stations) {
                continue;
            }
            let profile = build_profile(family, &dims, 4500.0, stations, &skewed_frame()).unwrap();
            let n = profile.point_count();
            assert!(n >= 3, "{descriptor}");
            assert!(profile.sections().iter().all(|s| s.len() == n), "{descriptor}");

            let faces = derive_faces(&profile);
            assert_eq!(faces.len(), (stations - 1) * n + 2, "{descriptor}");
            for face in faces.iter() {
                assert!(face.plane().is_ok(), "{descriptor} face {}", face.index());
            }
        }
    }
}

#[test]
fn uniform_end_station_is_translated_start_station() {
    let dims = Dimensions::from_pairs([
        ("width", 400.0),
        ("firstHeight", 300.0),
        ("secondHeight", 200.0),
    ]);
    let profile = build_profile(ProfileFamily::Ledge, &dims, 6000.0, 2, &Plane::world()).unwrap();
    let shift = Vector3::new(6000.0, 0.0, 0.0);
    for (a, b) in profile.first().points().iter().zip(profile.last().points()) {
        assert_relative_eq!(a + shift, *b);
    }

    // Same along an arbitrary frame, translated by length along the frame X axis
    let frame = skewed_frame();
    let profile = build_profile(ProfileFamily::Column, &Dimensions::from_pairs([("width", 300.0), ("depth", 450.0)]), 3200.0, 2, &frame).unwrap();
    let shift = frame.x_axis() * 3200.0;
    for (a, b) in profile.first().points().iter().zip(profile.last().points()) {
        assert_relative_eq!(a + shift, *b, epsilon = 1e-9);
    }
}

#[test]
fn rebuilding_is_bit_identical() {
    for descriptor in DESCRIPTORS {
        let first = Profile::from_descriptor(descriptor, 5000.0, &skewed_frame()).unwrap();
        let second = Profile::from_descriptor(descriptor, 5000.0, &skewed_frame()).unwrap();
        assert_eq!(first, second);

        let faces_a = derive_faces(&first);
        let faces_b = derive_faces(&second);
        for (a, b) in faces_a.iter().zip(faces_b.iter()) {
            assert_eq!(a.contour(), b.contour());
        }
    }
}

#[test]
fn tapered_wall_changes_height_between_stations() {
    let profile = Profile::from_descriptor("TW1800*350*900", 5000.0, &Plane::world()).unwrap();
    assert_relative_eq!(profile.first().points()[2].z, 1800.0);
    assert_relative_eq!(profile.last().points()[2].z, 900.0);

    let faces = derive_faces(&profile);
    // top face slopes down along the element
    let top = faces.lateral(0, 2).unwrap();
    let normal = top.normal().unwrap();
    assert!(normal.x.abs() > 0.0);
}

//! Integration tests for the tile planner
//!
//! These exercise the public planning API: broadcast detection, lane
//! partition coverage, memory-budget bounds, and parameter-block purity.

use selectv2::planner::{plan, BLOCK_SIZE, BUFFER_NUM};
use selectv2::{DType, Error, PlatformInfo};

fn platform() -> PlatformInfo {
    PlatformInfo::new(8, 16 * 1024)
}

#[test]
fn test_need_broadcast_flag_exact() {
    // (cond, x1, x2, y, expected)
    let cases: &[(&[usize], &[usize], &[usize], &[usize], bool)] = &[
        (&[2, 3], &[2, 3], &[2, 3], &[2, 3], false),
        (&[1, 3], &[2, 3], &[2, 3], &[2, 3], true),
        (&[2, 3], &[2, 1], &[2, 3], &[2, 3], true),
        (&[2, 3], &[2, 3], &[3], &[2, 3], true),
        (&[1], &[1], &[1], &[1], false),
        (&[1, 3], &[1, 3], &[1, 3], &[1, 3], false),
        (&[4, 1, 2], &[4, 1, 2], &[4, 1, 2], &[4, 1, 2], false),
    ];
    for &(c, a, b, y, expected) in cases {
        let params = plan(c, a, b, y, DType::F32, &platform()).unwrap();
        assert_eq!(
            params.need_broadcast != 0,
            expected,
            "cond={c:?} x1={a:?} x2={b:?}"
        );
    }
}

#[test]
fn test_lane_partition_covers_output() {
    for total_shape in [[1usize, 7], [4, 8], [25, 40], [128, 513]] {
        for lanes in [1u32, 2, 5, 8, 64] {
            let p = PlatformInfo::new(lanes, 16 * 1024);
            let shape: &[usize] = &total_shape;
            let params = plan(shape, shape, shape, shape, DType::F16, &p).unwrap();
            let tiling = params.tiling_plan();

            let mut covered = 0u32;
            for lane in 0..tiling.used_lane_num {
                let slice = tiling.lane_slice(lane);
                // Disjoint and in order.
                assert_eq!(slice.offset, covered);
                covered += slice.data_num;
            }
            assert_eq!(covered, params.total_data_num);
            assert_eq!(
                params.total_data_num as usize,
                total_shape.iter().product::<usize>()
            );
        }
    }
}

#[test]
fn test_memory_budget_bound() {
    // rate per dtype: how many block-sized buffers the compute path holds.
    let rates = [(DType::F16, 11u32), (DType::F32, 23), (DType::I8, 14), (DType::I32, 23)];
    for ub in [2048u32, 4 * 1024, 192 * 1024] {
        for (dtype, rate) in rates {
            let p = PlatformInfo::new(8, ub);
            let params = plan(&[1024], &[1024], &[1024], &[1024], dtype, &p).unwrap();
            let tile_cond_blocks = params.tile_data_num / BLOCK_SIZE;
            assert!(tile_cond_blocks >= 1);
            assert!(
                tile_cond_blocks * BLOCK_SIZE * rate * BUFFER_NUM <= ub,
                "dtype={dtype} ub={ub}"
            );
        }
    }
}

#[test]
fn test_planner_is_pure() {
    let shapes: (&[usize], &[usize], &[usize], &[usize]) =
        (&[3, 1, 5], &[2, 1, 5], &[3, 2, 1], &[3, 2, 5]);
    let a = plan(shapes.0, shapes.1, shapes.2, shapes.3, DType::I8, &platform()).unwrap();
    let b = plan(shapes.0, shapes.1, shapes.2, shapes.3, DType::I8, &platform()).unwrap();
    assert_eq!(a.as_bytes(), b.as_bytes());
}

#[test]
fn test_broadcast_forces_single_lane() {
    let params = plan(&[1, 64], &[64, 64], &[64, 64], &[64, 64], DType::F32, &platform()).unwrap();
    assert_eq!(params.used_lane_num, 1);

    let params = plan(&[64, 64], &[64, 64], &[64, 64], &[64, 64], DType::F32, &platform()).unwrap();
    assert!(params.used_lane_num > 1);
}

#[test]
fn test_rank_overflow_rejected() {
    let shape = vec![1usize; 9];
    let err = plan(&shape, &shape, &shape, &shape, DType::F32, &platform()).unwrap_err();
    assert!(matches!(err, Error::ShapeRankExceeded { rank: 9, max: 8 }));
}

#[test]
fn test_extent_overflow_rejected() {
    let shape = [65536usize];
    let err = plan(&shape, &shape, &shape, &shape, DType::F32, &platform()).unwrap_err();
    assert!(matches!(err, Error::ExtentOverflow { extent: 65536, .. }));
}

#[test]
fn test_unsupported_dtype_rejected() {
    let err = plan(&[4], &[4], &[4], &[4], DType::Bool, &platform()).unwrap_err();
    assert!(matches!(err, Error::UnsupportedDType { .. }));
}

#[test]
fn test_incompatible_shapes_rejected() {
    let err = plan(&[4], &[5], &[4], &[4], DType::F32, &platform()).unwrap_err();
    assert!(matches!(err, Error::BroadcastError { .. }));
}

#[test]
fn test_shapes_survive_packing_reversed() {
    // y [2,3]: reversed extents [3,2]; x1 [1,3] right-aligns to [3,1].
    let params = plan(&[2, 3], &[1, 3], &[2, 3], &[2, 3], DType::F32, &platform()).unwrap();
    assert_eq!(params.dim_num, 2);
    assert_eq!(params.y_shape[..2], [3, 2]);
    assert_eq!(params.x1_shape[..2], [3, 1]);
    assert_eq!(params.x1_strides[..2], [1, 0]);
    assert_eq!(params.y_strides[..2], [1, 3]);
}

use qsvm_prep::data::{load_from_reader, DataSource};
use qsvm_prep::pipeline::IN_MEMORY_SOURCE;
use qsvm_prep::preprocessing::Predicate;
use qsvm_prep::{
    KernelCentroidClassifier, Pipeline, PipelineConfig, PipelineError,
};

fn blobs_pipeline() -> Pipeline {
    Pipeline::new(PipelineConfig::blobs(100, 3, 13, 10598)).unwrap()
}

/// 36 автомобилей трех типов и 4 строки, которые фильтр должен отбросить
fn vehicles_csv() -> String {
    let types = ["SUV", "Sedan", "Sports"];
    let origins = ["Asia", "Europe", "USA"];
    let drivetrains = ["All", "Front", "Rear"];

    let mut csv = String::from(
        "Make,Model,Type,Origin,DriveTrain,MSRP,EngineSize,Cylinders,Horsepower,\
         MPG_City,MPG_Highway,Weight,Wheelbase,Length\n",
    );
    for i in 0..36usize {
        csv.push_str(&format!(
            "Make{},Model{},{},{},{},\"${},{:03}\",{:.1},{},{},{},{},{},{},{}\n",
            i % 5,
            i,
            types[i % 3],
            origins[(i / 3) % 3],
            drivetrains[(i / 2) % 3],
            20 + i,
            (i * 37) % 1000,
            1.5 + (i % 7) as f64 * 0.4,
            4 + 2 * ((i * 5) % 3),
            120 + i * 7,
            15 + (i * 3) % 13,
            22 + (i * 5) % 11,
            2800 + (i * 137) % 1500,
            100 + (i * 11) % 20,
            170 + (i * 13) % 40,
        ));
    }
    csv.push_str("Ford,F-150,Truck,USA,Rear,\"$25,000\",4.6,8,231,15,19,4788,126,218\n");
    csv.push_str("Mazda,RX-8,Sports,Asia,Rear,\"$25,700\",1.3,,197,18,24,3029,106,174\n");
    csv.push_str("Kia,Rio,Sedan,Asia,Front,\"$10,280\",1.6,4,99,26,33,2403,95,167\n");
    csv.push_str("Toyota,Prius,Hybrid,Asia,Front,\"$20,510\",1.5,4,110,59,51,2890,106,175\n");
    csv
}

#[test]
fn blobs_scenario_produces_five_dimensional_maps() {
    let prepared = blobs_pipeline()
        .prepare()
        .unwrap();
    let input = &prepared.input;

    assert_eq!(prepared.n_train + prepared.n_test, 100);
    assert_eq!(prepared.n_test, 30);
    assert_eq!(input.training.total_rows(), prepared.n_train);
    assert_eq!(input.test.total_rows(), prepared.n_test);
    assert_eq!(input.datapoints.nrows(), prepared.n_test);
    assert_eq!(input.datapoints.ncols(), 5);
    assert_eq!(input.datapoint_labels.len(), prepared.n_test);

    for map in [&input.training, &input.test] {
        assert_eq!(
            map.class_names().collect::<Vec<_>>(),
            vec!["class_0", "class_1", "class_2"]
        );
        for group in map.groups() {
            for vector in &group.vectors {
                assert_eq!(vector.len(), 5);
            }
        }
    }
}

#[test]
fn scaled_values_stay_within_unit_interval() {
    let prepared = blobs_pipeline().prepare().unwrap();
    let input = &prepared.input;

    let all = input
        .training
        .groups()
        .iter()
        .chain(input.test.groups())
        .flat_map(|g| g.vectors.iter())
        .flat_map(|v| v.iter());
    for v in all {
        assert!((-1.0 - 1e-12..=1.0 + 1e-12).contains(v), "value {} out of range", v);
    }
}

#[test]
fn preparation_is_deterministic() {
    let a = blobs_pipeline().prepare().unwrap();
    let b = blobs_pipeline().prepare().unwrap();
    assert_eq!(a.input.training, b.input.training);
    assert_eq!(a.input.test, b.input.test);
    assert_eq!(a.input.datapoints, b.input.datapoints);
}

#[test]
fn flattened_test_matrix_follows_class_order() {
    let prepared = blobs_pipeline().prepare().unwrap();
    let input = &prepared.input;

    let mut row = 0;
    for (k, group) in input.test.groups().iter().enumerate() {
        for vector in &group.vectors {
            assert_eq!(input.datapoint_labels[row], k);
            assert_eq!(input.datapoints.row(row).to_vec(), *vector);
            row += 1;
        }
    }
    assert_eq!(row, input.datapoints.nrows());
}

#[test]
fn empty_filter_fails_before_classifier() {
    let mut config = PipelineConfig::blobs(100, 3, 13, 1);
    config.filter = Predicate::Equals {
        column: "class".to_string(),
        value: "class_9".to_string(),
    };
    let pipeline = Pipeline::new(config).unwrap();
    let mut classifier = KernelCentroidClassifier::default();
    assert!(matches!(
        pipeline.run(&mut classifier),
        Err(PipelineError::NoData(_))
    ));
}

#[test]
fn vehicles_csv_end_to_end() {
    let table = load_from_reader(vehicles_csv().as_bytes()).unwrap();
    let config = PipelineConfig::vehicles(DataSource::Path("cars.csv".into()));
    let pipeline = Pipeline::new(config).unwrap();

    let prepared = pipeline.prepare_table(table).unwrap();
    assert_eq!(prepared.n_rows_loaded, 40);
    assert_eq!(prepared.n_rows_filtered, 36);
    assert_eq!(prepared.n_test, 11);
    assert_eq!(prepared.n_train, 25);
    assert_eq!(prepared.input.datapoints.dim(), (11, 5));
    assert_eq!(
        prepared.input.class_names,
        vec!["SUV".to_string(), "Sedan".to_string(), "Sports".to_string()]
    );
    assert_eq!(prepared.transforms.reducer().n_components(), 5);

    let mut classifier = KernelCentroidClassifier::default();
    let report = pipeline.run_prepared(prepared, &mut classifier).unwrap();
    assert_eq!(report.result.predicted_labels.len(), 11);
    assert_eq!(report.result.predicted_classes.len(), 11);
    assert!((0.0..=1.0).contains(&report.result.testing_accuracy));
    assert_eq!(report.source, IN_MEMORY_SOURCE);
}

#[test]
fn category_removed_by_filter_is_a_missing_column() {
    let table = load_from_reader(vehicles_csv().as_bytes()).unwrap();
    let mut config = PipelineConfig::vehicles(DataSource::Path("cars.csv".into()));
    // Без европейских машин колонка Origin_Europe не появится
    config.filter = Predicate::All(vec![
        config.filter.clone(),
        Predicate::Not(Box::new(Predicate::Equals {
            column: "Origin".to_string(),
            value: "Europe".to_string(),
        })),
    ]);
    let pipeline = Pipeline::new(config).unwrap();

    match pipeline.prepare_table(table) {
        Err(PipelineError::MissingColumns(cols)) => {
            assert_eq!(cols, vec!["Origin_Europe".to_string()]);
        }
        Err(e) => panic!("unexpected error: {}", e),
        Ok(_) => panic!("expected a missing column error"),
    }
}

#[test]
fn report_carries_classifier_result() {
    let pipeline = blobs_pipeline();
    let mut classifier = KernelCentroidClassifier::default();
    let report = pipeline.run(&mut classifier).unwrap();

    assert_eq!(report.classifier, "kernel-centroid");
    assert_eq!(report.source, pipeline.config().source.describe());
    assert_eq!(report.n_components, 5);
    assert_eq!(report.explained_variance_ratio.len(), 5);
    assert_eq!(report.result.predicted_labels.len(), report.n_test);
    assert!(report.result.testing_accuracy > 0.8);

    let json = serde_json::to_value(&report).unwrap();
    assert!(json["result"]["predicted_classes"].is_array());
}

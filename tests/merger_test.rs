use anyhow::Result;
use health_scraper::config::Config;
use health_scraper::merger::Merger;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn test_config(base: &Path) -> Config {
    let mut config = Config::default();
    config.data.raw_dir = base.join("raw").to_string_lossy().to_string();
    config.data.processed_dir = base.join("processed").to_string_lossy().to_string();
    config
}

fn write_raw_file(config: &Config, filename: &str, content: &str) -> Result<()> {
    fs::create_dir_all(&config.data.raw_dir)?;
    fs::write(Path::new(&config.data.raw_dir).join(filename), content)?;
    Ok(())
}

fn read_rows(path: &str) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?.iter().map(str::to_string).collect());
    }
    Ok((headers, rows))
}

#[test]
fn test_merged_rows_equal_sum_of_present_files() -> Result<()> {
    let temp_dir = tempdir()?;
    let config = test_config(temp_dir.path());

    write_raw_file(
        &config,
        "diabetes.csv",
        "id,title,text,created_utc,score,num_comments,subreddit,category\n\
         a,one,aaaa,1.0,1,0,diabetes,diabetes\n\
         b,two,bbbb,2.0,2,0,diabetes,diabetes\n\
         c,three,cccc,3.0,3,0,diabetes_t2,diabetes\n",
    )?;
    write_raw_file(
        &config,
        "sleep.csv",
        "id,title,text,created_utc,score,num_comments,subreddit,category\n\
         d,four,dddd,4.0,4,0,sleep,sleep\n\
         e,five,eeeee,5.0,5,1,insomnia,sleep\n",
    )?;

    let summary = Merger::new(&config).run()?.expect("summary produced");

    assert_eq!(summary.total_rows, 5);

    // absent categories contribute zero and do not error the run
    let counts: std::collections::HashMap<_, _> = summary
        .category_counts
        .iter()
        .map(|(c, n)| (c.as_str(), *n))
        .collect();
    assert_eq!(counts["diabetes"], 3);
    assert_eq!(counts["sleep"], 2);
    assert_eq!(counts["diet"], 0);
    assert_eq!(counts["weight_management"], 0);

    let (headers, rows) = read_rows(&summary.output_file)?;
    assert_eq!(rows.len(), 5);
    assert!(headers.contains(&"health_category".to_string()));
    assert!(headers.contains(&"source_file".to_string()));
    assert!(headers.contains(&"text_length".to_string()));

    let category_idx = headers.iter().position(|h| h == "health_category").unwrap();
    let source_idx = headers.iter().position(|h| h == "source_file").unwrap();
    let tagged_diabetes = rows.iter().filter(|r| r[category_idx] == "diabetes").count();
    let tagged_sleep = rows.iter().filter(|r| r[category_idx] == "sleep").count();
    assert_eq!(tagged_diabetes, 3);
    assert_eq!(tagged_sleep, 2);
    assert_eq!(rows[0][source_idx], "diabetes.csv");
    assert_eq!(rows[4][source_idx], "sleep.csv");
    Ok(())
}

#[test]
fn test_no_input_files_produces_no_output() -> Result<()> {
    let temp_dir = tempdir()?;
    let config = test_config(temp_dir.path());

    let result = Merger::new(&config).run()?;

    assert!(result.is_none());
    assert!(!Path::new(&config.data.processed_dir)
        .join("merged_health_data.csv")
        .exists());
    Ok(())
}

#[test]
fn test_text_length_stats_treat_missing_body_as_zero() -> Result<()> {
    let temp_dir = tempdir()?;
    let config = test_config(temp_dir.path());

    // bodies of length 4, 0 (missing) and 8
    write_raw_file(
        &config,
        "fitness.csv",
        "id,title,text\n1,a,wxyz\n2,b,\n3,c,abcdefgh\n",
    )?;

    let summary = Merger::new(&config).run()?.expect("summary produced");
    let stats = summary.text_stats.expect("title and text columns present");

    assert_eq!(stats.mean, 4.0);
    assert_eq!(stats.median, 4.0);

    let (headers, rows) = read_rows(&summary.output_file)?;
    let length_idx = headers.iter().position(|h| h == "text_length").unwrap();
    assert_eq!(rows[1][length_idx], "0");
    Ok(())
}

#[test]
fn test_text_stats_skipped_without_body_column() -> Result<()> {
    let temp_dir = tempdir()?;
    let config = test_config(temp_dir.path());

    write_raw_file(&config, "diet.csv", "id,title\n1,a\n")?;

    let summary = Merger::new(&config).run()?.expect("summary produced");

    assert!(summary.text_stats.is_none());
    assert!(!summary.columns.contains(&"text_length".to_string()));
    Ok(())
}

#[test]
fn test_missing_value_report_counts_empty_and_absent_cells() -> Result<()> {
    let temp_dir = tempdir()?;
    let config = test_config(temp_dir.path());

    // one empty title cell in the first file; the second file lacks the
    // score column entirely, so its rows pad it with empty cells
    write_raw_file(
        &config,
        "sleep.csv",
        "id,title,text,score\n1,,aaaa,10\n2,b,bbbb,20\n",
    )?;
    write_raw_file(&config, "substance.csv", "id,title,text\n3,c,cccc\n")?;

    let summary = Merger::new(&config).run()?.expect("summary produced");

    let missing: std::collections::HashMap<_, _> = summary
        .missing_counts
        .iter()
        .map(|(c, n)| (c.as_str(), *n))
        .collect();
    assert_eq!(missing.get("title"), Some(&1));
    assert_eq!(missing.get("score"), Some(&1));
    // fully populated columns are not listed
    assert!(!missing.contains_key("id"));
    assert!(!missing.contains_key("text"));
    assert!(!missing.contains_key("health_category"));
    Ok(())
}

#[test]
fn test_categories_merge_in_enumeration_order() -> Result<()> {
    let temp_dir = tempdir()?;
    let config = test_config(temp_dir.path());

    // written out of order on purpose; diabetes.csv precedes sleep.csv in
    // the fixed enumeration
    write_raw_file(&config, "sleep.csv", "id,title,text\ns1,a,aaaa\n")?;
    write_raw_file(&config, "diabetes.csv", "id,title,text\nd1,b,bbbb\n")?;

    let summary = Merger::new(&config).run()?.expect("summary produced");
    let (headers, rows) = read_rows(&summary.output_file)?;
    let id_idx = headers.iter().position(|h| h == "id").unwrap();

    assert_eq!(rows[0][id_idx], "d1");
    assert_eq!(rows[1][id_idx], "s1");
    Ok(())
}

#[test]
fn test_merged_file_is_overwritten_per_run() -> Result<()> {
    let temp_dir = tempdir()?;
    let config = test_config(temp_dir.path());

    write_raw_file(&config, "diet.csv", "id,title,text\n1,a,aaaa\n2,b,bbbb\n")?;
    let first = Merger::new(&config).run()?.expect("summary produced");
    assert_eq!(first.total_rows, 2);

    write_raw_file(&config, "diet.csv", "id,title,text\n9,z,zzzz\n")?;
    let second = Merger::new(&config).run()?.expect("summary produced");
    assert_eq!(second.total_rows, 1);

    let (_, rows) = read_rows(&second.output_file)?;
    assert_eq!(rows.len(), 1);
    Ok(())
}
